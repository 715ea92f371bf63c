//! Types for the render module.

use serde::Serialize;
use std::path::PathBuf;

/// A request to render one populated document.
#[derive(Debug, Clone)]
pub struct RenderJob {
    /// Populated document to render.
    pub source: PathBuf,
    /// Path of the rendered page document.
    pub output: PathBuf,
    /// Title embedded in the page document.
    pub title: String,
}

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderResult {
    pub output: PathBuf,
    pub size_bytes: u64,
}
