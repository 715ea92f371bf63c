//! Batch orchestrator.
//!
//! Drives one run through its states:
//! - **Validating**: required columns must be present, otherwise the run aborts
//! - **Grouping**: records are grouped by template, each template is resolved
//!   once and output identifiers are planned in input order
//! - **Running**: groups, then records, strictly sequential, with a progress
//!   event after each record and a cancellation check at each record boundary

mod cancel;
mod config;
mod grouping;
mod report;
mod runner;
mod types;

pub use cancel::CancelFlag;
pub use config::RunSettings;
pub use grouping::{group_by_template, TemplateGroup};
pub use runner::BatchOrchestrator;
pub use types::{BatchError, ProgressEvent, RunReport, RunState};
