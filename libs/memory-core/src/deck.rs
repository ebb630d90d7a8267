//! Deck assembly: pick sprites from a source, then deal them as shuffled pairs.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, SetupError};
use crate::sprites::{SpriteDetail, PLACEHOLDER_IMAGE};
use crate::types::{Card, Difficulty, Sprite};

/// Where candidate names and their sprites come from.
///
/// The browser driver implements this over HTTP; tests use an in-memory table.
#[allow(async_fn_in_trait)]
pub trait SpriteSource {
    /// Every candidate name. Failure here aborts setup.
    async fn list_names(&self) -> Result<Vec<String>>;

    /// Sprite fields for a single name.
    async fn sprite_detail(&self, name: &str) -> Result<SpriteDetail>;
}

/// Resolve the image for `name`, falling back to the placeholder on any failure.
pub async fn fetch_sprite<S: SpriteSource>(source: &S, name: &str) -> String {
    match source.sprite_detail(name).await {
        Ok(detail) => detail
            .best_image()
            .unwrap_or(PLACEHOLDER_IMAGE)
            .to_string(),
        Err(e) => {
            log::warn!("Error fetching {}: {}", name, e);
            PLACEHOLDER_IMAGE.to_string()
        }
    }
}

/// Pick `pairs` distinct sprites from the shuffled candidate pool.
///
/// Names that only resolve to the placeholder are skipped, as are images
/// already picked under another name. Running out of candidates is an error
/// rather than an undersized board.
pub async fn collect_sprites<S, R>(source: &S, pairs: usize, rng: &mut R) -> Result<Vec<Sprite>>
where
    S: SpriteSource,
    R: Rng + ?Sized,
{
    let mut names = source.list_names().await?;
    names.shuffle(rng);

    let mut picks = Vec::with_capacity(pairs);
    let mut seen_images = HashSet::new();

    for name in names {
        if picks.len() == pairs {
            break;
        }

        let image_url = fetch_sprite(source, &name).await;
        if image_url == PLACEHOLDER_IMAGE || !seen_images.insert(image_url.clone()) {
            continue;
        }

        picks.push(Sprite { name, image_url });
    }

    if picks.len() < pairs {
        return Err(SetupError::NotEnoughSprites {
            needed: pairs,
            found: picks.len(),
        });
    }

    Ok(picks)
}

/// Duplicate each sprite into a pair of face-down cards and shuffle them.
pub fn deal<R: Rng + ?Sized>(sprites: &[Sprite], rng: &mut R) -> Vec<Card> {
    let mut cards: Vec<Card> = sprites
        .iter()
        .chain(sprites.iter())
        .map(Card::face_down)
        .collect();
    cards.shuffle(rng);
    cards
}

/// Collect and deal a full board for `difficulty`.
pub async fn build_deck<S, R>(source: &S, difficulty: Difficulty, rng: &mut R) -> Result<Vec<Card>>
where
    S: SpriteSource,
    R: Rng + ?Sized,
{
    let sprites = collect_sprites(source, difficulty.total_pairs(), rng).await?;
    Ok(deal(&sprites, rng))
}
