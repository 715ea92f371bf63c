//! Error types for the document module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while populating a template.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The template has no attribute element matching any tag.
    #[error("No attributes found in template: {path}")]
    NoAttributes { path: PathBuf },

    /// The template could not be read.
    #[error("Failed to read template {path}")]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template content is not a valid document.
    #[error("Invalid template {path}: {reason}")]
    InvalidTemplate { path: PathBuf, reason: String },

    /// The populated document could not be written.
    #[error("Failed to save {path}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The blocking worker running the document code failed.
    #[error("Document task failed: {0}")]
    Task(String),
}

impl DocumentError {
    /// Whether this error means the template simply has nothing to fill.
    pub fn is_no_attributes(&self) -> bool {
        matches!(self, Self::NoAttributes { .. })
    }

    /// Error message including the underlying cause, for reports.
    pub fn reason(&self) -> String {
        match self {
            Self::TemplateUnreadable { source, .. } | Self::SaveFailed { source, .. } => {
                format!("{}: {}", self, source)
            }
            _ => self.to_string(),
        }
    }
}
