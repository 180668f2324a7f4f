//! Typed failures surfaced to the presentation layer.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The source table is missing, unparseable, or has no header row.
    #[error("resource data unavailable: {reason}")]
    DataUnavailable { reason: String },

    /// Detail lookup on a position outside the dataset.
    #[error("resource not found at position {position} (dataset has {len} rows)")]
    NotFound { position: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
