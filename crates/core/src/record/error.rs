//! Error types for record sources.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading input records.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Input file not found.
    #[error("Input file not found: {path}")]
    NotFound { path: PathBuf },

    /// The header row is missing or empty.
    #[error("Input has no header row: {path}")]
    MissingHeader { path: PathBuf },

    /// A data row could not be decoded.
    #[error("Failed to read row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    /// I/O error while reading the input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking parse task failed.
    #[error("Parse task failed: {0}")]
    Task(String),
}
