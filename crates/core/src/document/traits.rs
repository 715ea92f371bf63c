//! Trait definitions for the document module.

use async_trait::async_trait;

use super::error::DocumentError;
use super::types::{PopulateJob, PopulateResult};

/// A backend that can fill a template's attributes and save a new document.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Returns the name of this backend implementation.
    fn name(&self) -> &str;

    /// Opens the template, writes every attribute whose tag matches an
    /// element of the template and saves the result to `job.output`.
    ///
    /// Returns `DocumentError::NoAttributes` (and writes nothing) when no
    /// element matches.
    async fn populate(&self, job: PopulateJob) -> Result<PopulateResult, DocumentError>;
}
