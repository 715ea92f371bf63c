//! Record processor implementation.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::document::{DocumentBackend, PopulateJob};
use crate::normalize::AttributeSet;
use crate::record::Record;
use crate::render::{RenderJob, Renderer};
use crate::template::is_plain_name;

use super::types::{
    PlannedRecord, ProcessContext, ProcessingOutcome, RecordPlan, RenderStatus, RenderTarget,
};

/// Structural check of a record.
///
/// Returns the reason when the record cannot be processed: blank output
/// identifier, blank template name, or an identifier that cannot be used as
/// a file name.
pub fn validate_record(record: &Record) -> Result<(), String> {
    let declared = record.declared_id();
    if declared.is_empty() {
        return Err("blank output identifier (POSICAO)".to_string());
    }
    if record.template_name().is_empty() {
        return Err("blank template name (TipoSuporte)".to_string());
    }
    if !is_plain_name(&declared) {
        return Err(format!("identifier '{}' is not a valid file name", declared));
    }
    Ok(())
}

/// Processes one planned record at a time.
pub struct RecordProcessor<D: DocumentBackend, R: Renderer> {
    backend: D,
    renderer: R,
}

impl<D: DocumentBackend, R: Renderer> RecordProcessor<D, R> {
    pub fn new(backend: D, renderer: R) -> Self {
        Self { backend, renderer }
    }

    /// Processes a planned record and classifies the outcome.
    pub async fn process(&self, planned: &PlannedRecord, ctx: &ProcessContext) -> ProcessingOutcome {
        let (template, identifier) = match &planned.plan {
            RecordPlan::Invalid(reason) => {
                return ProcessingOutcome::ValidationError {
                    reason: reason.clone(),
                }
            }
            RecordPlan::TemplateMissing { expected } => {
                return ProcessingOutcome::TemplateMissing {
                    expected: expected.clone(),
                }
            }
            RecordPlan::Ready {
                template,
                identifier,
            } => (template, identifier),
        };

        let attributes = AttributeSet::from_record(&planned.record, &ctx.date_stamp);
        let job = PopulateJob {
            template: template.clone(),
            output: ctx.artifact_path(&identifier.final_id),
            attributes,
        };

        let populated = match self.backend.populate(job).await {
            Ok(result) => result,
            Err(e) if e.is_no_attributes() => return ProcessingOutcome::NoAttributesFound,
            Err(e) => return ProcessingOutcome::DocumentFailed { reason: e.reason() },
        };

        let render = match &ctx.render {
            Some(target) => Some(self.render(&populated.output, &identifier.final_id, target).await),
            None => None,
        };

        ProcessingOutcome::Success {
            artifact: populated.output,
            attributes_written: populated.attributes_written,
            render,
        }
    }

    async fn render(
        &self,
        source: &Path,
        final_id: &str,
        target: &RenderTarget,
    ) -> RenderStatus {
        let job = RenderJob {
            source: source.to_path_buf(),
            output: target
                .folder
                .join(format!("{}{}", final_id, self.renderer.extension())),
            title: final_id.to_string(),
        };

        debug!(renderer = self.renderer.name(), output = %job.output.display(), "Rendering");

        match self.renderer.render(job).await {
            Ok(result) => RenderStatus::Rendered(result.output),
            Err(e) => RenderStatus::Failed(e.to_string()),
        }
    }

    /// One log line naming the record, and emits it at the matching level.
    pub fn log_outcome(planned: &PlannedRecord, outcome: &ProcessingOutcome) -> String {
        let line = Self::log_line(planned, outcome);
        match outcome {
            ProcessingOutcome::Success {
                render: Some(RenderStatus::Failed(_)),
                ..
            } => warn!("{}", line),
            ProcessingOutcome::Success { .. } => info!("{}", line),
            _ => warn!("{}", line),
        }
        line
    }

    /// Human-readable line describing a record outcome.
    pub fn log_line(planned: &PlannedRecord, outcome: &ProcessingOutcome) -> String {
        let record = &planned.record;
        let id = match planned.identifier() {
            id if id.is_empty() => "?".to_string(),
            id => id,
        };
        let prefix = format!("[row {}] {}", record.row, id);

        match outcome {
            ProcessingOutcome::Success {
                artifact,
                attributes_written,
                render,
            } => {
                let file = artifact
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let mut line = format!(
                    "{}: generated {} ({} attributes)",
                    prefix, file, attributes_written
                );
                if let RecordPlan::Ready { identifier, .. } = &planned.plan {
                    if identifier.is_renamed() {
                        line.push_str(&format!(" [renamed from {}]", identifier.declared));
                    }
                }
                match render {
                    Some(RenderStatus::Rendered(path)) => {
                        line.push_str(&format!("; rendered {}", path.display()))
                    }
                    Some(RenderStatus::Failed(reason)) => {
                        line.push_str(&format!("; render failed: {}", reason))
                    }
                    None => {}
                }
                line
            }
            ProcessingOutcome::TemplateMissing { expected } => {
                format!("{}: template not found: {}", prefix, expected.display())
            }
            ProcessingOutcome::NoAttributesFound => format!(
                "{}: no attributes found in template {}",
                prefix,
                record.template_name()
            ),
            ProcessingOutcome::ValidationError { reason } => {
                format!("{}: invalid record: {}", prefix, reason)
            }
            ProcessingOutcome::DocumentFailed { reason } => {
                format!("{}: document error: {}", prefix, reason)
            }
        }
    }
}
