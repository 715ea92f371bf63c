//! Types for the processor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::collision::ResolvedIdentifier;
use crate::record::Record;

/// Where rendered pages go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTarget {
    /// Folder for rendered pages, created on demand.
    pub folder: PathBuf,
}

/// Per-run context shared by every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessContext {
    /// Folder receiving populated documents.
    pub output_folder: PathBuf,
    /// Extension of populated documents (with leading dot).
    pub output_extension: String,
    /// Value of the current-date tag, computed once per run.
    pub date_stamp: String,
    /// Render target, `None` when rendering is disabled.
    pub render: Option<RenderTarget>,
}

impl ProcessContext {
    /// Path of the populated document for a final identifier.
    pub fn artifact_path(&self, final_id: &str) -> PathBuf {
        self.output_folder
            .join(format!("{}{}", final_id, self.output_extension))
    }
}

/// Decisions taken for a record before it is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordPlan {
    /// The record failed the structural check.
    Invalid(String),
    /// The record's template does not exist.
    TemplateMissing { expected: PathBuf },
    /// The record will reach the document backend.
    Ready {
        template: PathBuf,
        identifier: ResolvedIdentifier,
    },
}

/// A record together with its plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRecord {
    pub record: Record,
    pub plan: RecordPlan,
}

impl PlannedRecord {
    /// Final identifier when one was claimed, the declared one otherwise.
    pub fn identifier(&self) -> String {
        match &self.plan {
            RecordPlan::Ready { identifier, .. } => identifier.final_id.clone(),
            _ => self.record.declared_id(),
        }
    }
}

/// Result of rendering a successfully populated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum RenderStatus {
    Rendered(PathBuf),
    Failed(String),
}

/// Outcome of processing one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProcessingOutcome {
    /// The populated document was saved.
    Success {
        artifact: PathBuf,
        attributes_written: usize,
        /// `None` when rendering is disabled.
        render: Option<RenderStatus>,
    },
    /// No template file for the record; nothing written.
    TemplateMissing { expected: PathBuf },
    /// The template has no matching attribute element; nothing written.
    NoAttributesFound,
    /// The record failed the structural check.
    ValidationError { reason: String },
    /// The document backend failed for another reason.
    DocumentFailed { reason: String },
}

impl ProcessingOutcome {
    pub fn summary(&self) -> OutcomeSummary {
        match self {
            Self::Success { .. } => OutcomeSummary::Success,
            Self::TemplateMissing { .. } => OutcomeSummary::TemplateMissing,
            Self::NoAttributesFound => OutcomeSummary::NoAttributesFound,
            Self::ValidationError { .. } => OutcomeSummary::ValidationError,
            Self::DocumentFailed { .. } => OutcomeSummary::DocumentFailed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Kind of a processing outcome, as carried by progress events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSummary {
    Success,
    TemplateMissing,
    NoAttributesFound,
    ValidationError,
    DocumentFailed,
}
