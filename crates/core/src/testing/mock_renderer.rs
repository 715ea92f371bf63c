//! Mock renderer for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::render::{RenderError, RenderJob, RenderResult, Renderer};

/// Mock implementation of the Renderer trait.
///
/// Writes a placeholder page document. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    /// Recorded jobs, in call order.
    jobs: Arc<RwLock<Vec<RenderJob>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<RenderError>>>,
    /// If set, every call fails with this message.
    always_fail: Arc<RwLock<Option<String>>>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded render jobs.
    pub async fn recorded_jobs(&self) -> Vec<RenderJob> {
        self.jobs.read().await.clone()
    }

    /// Get the number of render calls.
    pub async fn render_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: RenderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every call fail with a PDF error carrying `message`.
    pub async fn set_always_fail(&self, message: &str) {
        *self.always_fail.write().await = Some(message.to_string());
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    fn name(&self) -> &str {
        "mock"
    }

    fn extension(&self) -> &str {
        ".pdf"
    }

    async fn render(&self, job: RenderJob) -> Result<RenderResult, RenderError> {
        self.jobs.write().await.push(job.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        if let Some(message) = self.always_fail.read().await.clone() {
            return Err(RenderError::Pdf(message));
        }

        if let Some(parent) = job.output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| RenderError::WriteFailed {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let content = format!("%PDF-mock {}\n", job.title);
        tokio::fs::write(&job.output, &content)
            .await
            .map_err(|source| RenderError::WriteFailed {
                path: job.output.clone(),
                source,
            })?;

        Ok(RenderResult {
            output: job.output,
            size_bytes: content.len() as u64,
        })
    }
}
