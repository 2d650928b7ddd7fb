//! Error types used throughout the engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Slotwise
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum SlotwiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// All expansion windows were exhausted without finding a single
    /// non-rejected slot. This is a valid business outcome, kept separate
    /// from transport failures so callers can render it distinctly.
    #[error("No availability between {searched_from} and {searched_to}")]
    NoAvailability { searched_from: DateTime<Utc>, searched_to: DateTime<Utc> },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Slotwise operations
pub type Result<T> = std::result::Result<T, SlotwiseError>;

impl SlotwiseError {
    /// Stable label suitable for metrics/logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::InvalidInput(_) => "invalid_input",
            Self::NoAvailability { .. } => "no_availability",
            Self::Internal(_) => "internal",
        }
    }
}
