//! Error types
//!
//! Only configuration can fail hard, and only before the first tick.
//! Collaborator failures are reported and dropped by whoever hit them.

use thiserror::Error;

/// Rejected gameplay configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("{name} range is empty or inverted: [{min}, {max}]")]
    BadRange {
        name: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{name} must be at least 1")]
    Zero { name: &'static str },

    #[error("pool is empty: every spawn count is zero")]
    EmptyPool,

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of an external collaborator (audio, model loading, leaderboard)
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("audio unavailable: {0}")]
    Audio(String),

    #[error("asset load failed: {0}")]
    AssetLoad(String),

    #[error("leaderboard submit failed: {0}")]
    Leaderboard(String),
}
