//! Stories demo: error types.

use stories_core::error::DomainError;
use thiserror::Error;

/// Startup and runtime errors for the demo binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The catalog or playback configuration was rejected.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The catalog file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
