//! Sprite payloads returned by the character API.

use serde::{Deserialize, Serialize};

/// Image used when no usable sprite could be fetched.
pub const PLACEHOLDER_IMAGE: &str = "/images/poke-ball.png";

/// Maximum number of names requested from the collection endpoint.
pub const CANDIDATE_LIMIT: usize = 1500;

/// Collection endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedResourceList {
    #[serde(default)]
    pub count: Option<u64>,
    pub results: Vec<NamedResource>,
}

impl NamedResourceList {
    /// Names in the order the API returned them.
    pub fn into_names(self) -> Vec<String> {
        self.results.into_iter().map(|r| r.name).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Per-name detail response. Only the sprite fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpriteDetail {
    #[serde(default)]
    pub sprites: Sprites,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(default, rename = "official-artwork")]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

impl SpriteDetail {
    /// Official artwork if present, else the default front sprite.
    pub fn best_image(&self) -> Option<&str> {
        let artwork = self
            .sprites
            .other
            .as_ref()
            .and_then(|o| o.official_artwork.as_ref())
            .and_then(|a| a.front_default.as_deref())
            .filter(|url| !url.is_empty());

        artwork.or_else(|| {
            self.sprites
                .front_default
                .as_deref()
                .filter(|url| !url.is_empty())
        })
    }
}
