//! Error types for memory-core.

use thiserror::Error;

/// Result type alias using SetupError.
pub type Result<T> = std::result::Result<T, SetupError>;

/// Errors that can occur while assembling a deck.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("could not load the candidate list: {0}")]
    CandidateList(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("only found {found} of {needed} sprites")]
    NotEnoughSprites { needed: usize, found: usize },
}
