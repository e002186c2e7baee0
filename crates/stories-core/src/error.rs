//! Domain error types.
//!
//! Navigation itself never fails: out-of-range targets are boundary
//! transitions and indeterminate progress is dropped. These errors only
//! surface while a catalog or configuration is being built.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A catalog or story group violates a structural rule.
    #[error("validation error: {0}")]
    Validation(String),

    /// A catalog document could not be parsed.
    #[error("catalog parse error: {0}")]
    CatalogParse(String),

    /// A playback timing value is out of range.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
