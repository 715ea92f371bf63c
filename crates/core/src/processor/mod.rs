//! Per-record unit of work.
//!
//! The `RecordProcessor` takes a planned record (validated, template
//! resolved, identifier claimed) and drives it through the document backend
//! and, when enabled, the renderer. Every backend error is turned into a
//! `ProcessingOutcome` here; nothing escapes to the orchestrator.

mod record;
mod types;

pub use record::{validate_record, RecordProcessor};
pub use types::{
    OutcomeSummary, PlannedRecord, ProcessContext, ProcessingOutcome, RecordPlan, RenderStatus,
    RenderTarget,
};
