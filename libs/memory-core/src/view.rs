//! Render-ready snapshot of a session.

use serde::{Deserialize, Serialize};

use crate::session::GameSession;
use crate::types::{Banner, Phase};

/// One card as the page should draw it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub index: usize,
    pub name: String,
    pub image_url: String,
    pub face_up: bool,
    pub matched: bool,
}

/// Everything the page shows, derived from a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub columns: u32,
    pub cards: Vec<CardView>,
    pub clicks: u32,
    pub matched: usize,
    pub total_pairs: usize,
    pub remaining: usize,
    /// Countdown as `mm:ss`.
    pub clock: String,
    pub powerup_enabled: bool,
    pub powerups_left: u32,
    pub busy: bool,
    pub loading: bool,
    pub banner: Option<Banner>,
}

impl BoardView {
    pub fn from_session(session: &GameSession) -> Self {
        let cards = session
            .cards()
            .iter()
            .enumerate()
            .map(|(index, card)| CardView {
                index,
                name: card.name.clone(),
                image_url: card.image_url.clone(),
                face_up: card.flipped || card.matched,
                matched: card.matched,
            })
            .collect();

        Self {
            columns: session.difficulty().cols(),
            cards,
            clicks: session.clicks(),
            matched: session.matched_pairs(),
            total_pairs: session.total_pairs(),
            remaining: session.remaining_pairs(),
            clock: format_clock(session.seconds_left()),
            powerup_enabled: session.powerup_available(),
            powerups_left: session.powerups_left(),
            busy: session.is_busy(),
            loading: session.phase() == Phase::Loading,
            banner: session.banner().cloned(),
        }
    }
}

/// Format seconds as zero-padded `mm:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
