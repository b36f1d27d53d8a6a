//! Error types for the whack-a-mole core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[cfg(feature = "serde_json")]
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
