//! Error types for the render module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering a page.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document has no paper-space layout with content.
    #[error("No print layout found")]
    NoPrintLayout,

    /// The source document could not be read.
    #[error("Failed to read {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source document could not be decoded.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// The page document could not be produced.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// The page document could not be written.
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The render task did not complete.
    #[error("Render task failed: {0}")]
    Task(String),
}
