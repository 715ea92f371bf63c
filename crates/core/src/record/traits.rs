//! Trait definitions for record sources.

use async_trait::async_trait;

use super::error::SourceError;
use super::types::RecordBatch;

/// A source of support records (the parsed input sheet).
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns the name of this source implementation.
    fn name(&self) -> &str;

    /// Loads the whole sheet, header first, rows in sheet order.
    async fn load(&self) -> Result<RecordBatch, SourceError>;
}
