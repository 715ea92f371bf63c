//! Mock document backend for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::document::{DocumentBackend, DocumentError, PopulateJob, PopulateResult};

/// Mock implementation of the DocumentBackend trait.
///
/// Writes a small text artifact (`TAG=value` lines) instead of a drawing.
/// Clones share state, so a test can keep a handle while the orchestrator
/// owns another.
///
/// Provides controllable behavior for testing:
/// - Track populate jobs for assertions
/// - Fail the next call with a given error
/// - Report "no attributes" for selected templates
#[derive(Debug, Clone, Default)]
pub struct MockDocumentBackend {
    /// Recorded jobs, in call order.
    jobs: Arc<RwLock<Vec<PopulateJob>>>,
    /// If set, the next call will fail with this error.
    next_error: Arc<RwLock<Option<DocumentError>>>,
    /// Template names (file stems) without attribute elements.
    no_attributes: Arc<RwLock<HashSet<String>>>,
}

impl MockDocumentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded jobs.
    pub async fn recorded_jobs(&self) -> Vec<PopulateJob> {
        self.jobs.read().await.clone()
    }

    /// Get the number of populate calls.
    pub async fn call_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: DocumentError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make a template behave as if it had no attribute elements.
    pub async fn set_no_attributes(&self, template: &str) {
        self.no_attributes.write().await.insert(template.to_string());
    }
}

#[async_trait]
impl DocumentBackend for MockDocumentBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn populate(&self, job: PopulateJob) -> Result<PopulateResult, DocumentError> {
        self.jobs.write().await.push(job.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let stem = job
            .template
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.no_attributes.read().await.contains(&stem) {
            return Err(DocumentError::NoAttributes {
                path: job.template.clone(),
            });
        }

        let content: String = job
            .attributes
            .iter()
            .map(|(tag, value)| format!("{}={}\n", tag, value))
            .collect();
        tokio::fs::write(&job.output, content)
            .await
            .map_err(|e| DocumentError::SaveFailed {
                path: job.output.clone(),
                source: e,
            })?;

        Ok(PopulateResult {
            output: job.output,
            elements_found: job.attributes.len(),
            attributes_written: job.attributes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::AttributeSet;
    use crate::testing::fixtures;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn job(dir: &TempDir, template: &str) -> PopulateJob {
        PopulateJob {
            template: PathBuf::from(format!("/templates/{}.dxf", template)),
            output: dir.path().join("POS-001.dxf"),
            attributes: AttributeSet::from_record(
                &fixtures::record(1, "POS-001", template),
                "01/01/2026",
            ),
        }
    }

    #[tokio::test]
    async fn test_writes_artifact() {
        let dir = TempDir::new().unwrap();
        let backend = MockDocumentBackend::new();

        let result = backend.populate(job(&dir, "A")).await.unwrap();
        let content = std::fs::read_to_string(&result.output).unwrap();
        assert!(content.contains("POSICAO=POS-001\n"));
        assert_eq!(backend.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_no_attributes_template() {
        let dir = TempDir::new().unwrap();
        let backend = MockDocumentBackend::new();
        backend.set_no_attributes("B").await;

        let err = backend.populate(job(&dir, "B")).await.unwrap_err();
        assert!(err.is_no_attributes());
        assert!(!dir.path().join("POS-001.dxf").exists());
    }

    #[tokio::test]
    async fn test_next_error_is_consumed() {
        let dir = TempDir::new().unwrap();
        let backend = MockDocumentBackend::new();
        backend
            .set_next_error(DocumentError::InvalidTemplate {
                path: PathBuf::from("/templates/A.dxf"),
                reason: "bad".to_string(),
            })
            .await;

        assert!(backend.populate(job(&dir, "A")).await.is_err());
        assert!(backend.populate(job(&dir, "A")).await.is_ok());
    }
}
