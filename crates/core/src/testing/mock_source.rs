//! In-memory record source for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::record::{RecordBatch, RecordSource, SourceError};

/// A record source serving a fixed batch, or failing like an unreadable file.
#[derive(Debug, Clone)]
pub struct StaticRecordSource {
    batch: RecordBatch,
    /// When set, `load` fails as if this file did not exist.
    missing: Option<PathBuf>,
    loads: Arc<RwLock<usize>>,
}

impl StaticRecordSource {
    pub fn new(batch: RecordBatch) -> Self {
        Self {
            batch,
            missing: None,
            loads: Arc::new(RwLock::new(0)),
        }
    }

    /// A source whose input file does not exist.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self {
            missing: Some(path.into()),
            ..Self::new(RecordBatch::default())
        }
    }

    /// Number of times the batch was loaded.
    pub async fn load_count(&self) -> usize {
        *self.loads.read().await
    }
}

#[async_trait]
impl RecordSource for StaticRecordSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn load(&self) -> Result<RecordBatch, SourceError> {
        *self.loads.write().await += 1;
        match &self.missing {
            Some(path) => Err(SourceError::NotFound { path: path.clone() }),
            None => Ok(self.batch.clone()),
        }
    }
}
