//! Core types for the memory game.

use serde::{Deserialize, Serialize};

/// Board difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Get the difficulty name as used by the page's select element.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Grid columns.
    pub fn cols(self) -> u32 {
        match self {
            Self::Easy => 3,
            Self::Medium => 4,
            Self::Hard => 6,
        }
    }

    /// Grid rows.
    pub fn rows(self) -> u32 {
        match self {
            Self::Easy => 2,
            Self::Medium => 3,
            Self::Hard => 3,
        }
    }

    /// Countdown length in seconds.
    pub fn time_limit_secs(self) -> u32 {
        match self {
            Self::Easy => 60,
            Self::Medium => 90,
            Self::Hard => 120,
        }
    }

    /// How many times the reveal power-up may be used per game.
    pub fn max_powerups(self) -> u32 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    pub fn total_pairs(self) -> usize {
        (self.cols() * self.rows() / 2) as usize
    }
}

/// Page colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Self::Light
    }
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Class applied to the document body.
    pub fn body_class(&self) -> String {
        format!("{}-theme", self.as_str())
    }
}

/// A sprite accepted for the board: one per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    pub image_url: String,
}

impl Sprite {
    pub fn new(name: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: image_url.into(),
        }
    }
}

/// A single card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub image_url: String,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    /// Create a face-down card showing the given sprite.
    pub fn face_down(sprite: &Sprite) -> Self {
        Self {
            name: sprite.name.clone(),
            image_url: sprite.image_url.clone(),
            flipped: false,
            matched: false,
        }
    }

    /// Two cards form a pair when they show the same image.
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.image_url == other.image_url
    }
}

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Playing,
    Won,
    TimedOut,
    /// Deck assembly failed; nothing to play until the next start.
    Failed,
}

impl Default for Phase {
    fn default() -> Self {
        Self::Idle
    }
}

impl Phase {
    /// Whether the game has reached an end state.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::TimedOut | Self::Failed)
    }
}

/// Banner style, mirroring the page's alert classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerKind {
    Success,
    Danger,
    Warning,
}

impl BannerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
            Self::Warning => "warning",
        }
    }
}

/// Dismissible message shown above the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub icon: String,
    pub heading: String,
    pub text: String,
}

impl Banner {
    pub fn won() -> Self {
        Self {
            kind: BannerKind::Success,
            icon: "🎉".to_string(),
            heading: "Congratulations!".to_string(),
            text: "You matched all the cards! Great job!".to_string(),
        }
    }

    pub fn timed_out() -> Self {
        Self {
            kind: BannerKind::Danger,
            icon: "⏰".to_string(),
            heading: "Oh no!".to_string(),
            text: "Time’s up! Better luck next time.".to_string(),
        }
    }

    pub fn setup_failed(reason: &str) -> Self {
        Self {
            kind: BannerKind::Warning,
            icon: "⚠️".to_string(),
            heading: "Could not deal the cards.".to_string(),
            text: format!("{reason}. Press Start to try again."),
        }
    }
}
