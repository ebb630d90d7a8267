//! Core memory-matching game library shared by the browser driver.
//!
//! Provides:
//! - Difficulty table and shared types (Card, Sprite, Phase, Theme, etc.)
//! - Deck assembly from a sprite source with placeholder fallback
//! - The game session state machine (events in, effects out)
//! - View derivation for rendering a session

pub mod deck;
pub mod error;
pub mod session;
pub mod sprites;
pub mod types;
pub mod view;

pub use deck::{build_deck, collect_sprites, deal, fetch_sprite, SpriteSource};
pub use error::{Result, SetupError};
pub use session::{Effect, Event, GameSession, TimerKind, Token};
pub use sprites::{SpriteDetail, PLACEHOLDER_IMAGE};
pub use types::{Banner, BannerKind, Card, Difficulty, Phase, Sprite, Theme};
pub use view::{format_clock, BoardView, CardView};
