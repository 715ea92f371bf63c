//! Trait definitions for the render module.

use async_trait::async_trait;

use super::error::RenderError;
use super::types::{RenderJob, RenderResult};

/// A renderer that produces a page document from a populated document.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Returns the name of this renderer implementation.
    fn name(&self) -> &str;

    /// File extension of the produced page documents (with leading dot).
    fn extension(&self) -> &str;

    /// Renders `job.source` into `job.output`, creating the output folder
    /// when needed.
    async fn render(&self, job: RenderJob) -> Result<RenderResult, RenderError>;
}
