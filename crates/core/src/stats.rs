//! Run statistics.
//!
//! `StatsAggregator` is the only writer of `RunStatistics`; the orchestrator
//! feeds it one outcome per processed record and takes the finished
//! statistics at the end of the run.

use serde::{Deserialize, Serialize};

use crate::processor::{PlannedRecord, ProcessingOutcome, RecordPlan, RenderStatus};

/// A record that failed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordIssue {
    pub row: usize,
    pub identifier: String,
    pub reason: String,
}

/// A duplicate identifier that was renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRename {
    pub row: usize,
    pub original: String,
    pub renamed: String,
}

/// Counters and detail lists of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Records in the input.
    pub total_records: usize,
    /// Records that went through the processor.
    pub processed: usize,
    /// Template groups.
    pub groups: usize,
    pub success: usize,
    pub template_missing: usize,
    pub no_attributes: usize,
    pub validation_errors: usize,
    pub document_errors: usize,
    /// Identifiers renamed because they were already used.
    pub duplicates: usize,
    pub renders_generated: usize,
    pub renders_failed: usize,

    /// `<id> (template: <name>)` per record with a missing template.
    pub missing_templates: Vec<String>,
    /// `<id> (template: <name>)` per record whose template had no attribute.
    pub templates_without_attributes: Vec<String>,
    /// Renames, ordered by source row.
    pub renames: Vec<DuplicateRename>,
    pub invalid_records: Vec<RecordIssue>,
    pub document_failures: Vec<RecordIssue>,
    pub render_failures: Vec<RecordIssue>,
}

impl RunStatistics {
    /// Records that did not produce a document.
    pub fn failed(&self) -> usize {
        self.template_missing + self.no_attributes + self.validation_errors + self.document_errors
    }
}

/// Accumulates statistics across a run.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    stats: RunStatistics,
}

impl StatsAggregator {
    pub fn new(total_records: usize, groups: usize) -> Self {
        Self {
            stats: RunStatistics {
                total_records,
                groups,
                ..RunStatistics::default()
            },
        }
    }

    /// Records the outcome of one processed record.
    pub fn observe(&mut self, planned: &PlannedRecord, outcome: &ProcessingOutcome) {
        let stats = &mut self.stats;
        let row = planned.record.row;
        let identifier = planned.identifier();
        stats.processed += 1;

        if let RecordPlan::Ready { identifier: id, .. } = &planned.plan {
            if id.is_renamed() {
                stats.duplicates += 1;
                stats.renames.push(DuplicateRename {
                    row,
                    original: id.declared.clone(),
                    renamed: id.final_id.clone(),
                });
            }
        }

        match outcome {
            ProcessingOutcome::Success { render, .. } => {
                stats.success += 1;
                match render {
                    Some(RenderStatus::Rendered(_)) => stats.renders_generated += 1,
                    Some(RenderStatus::Failed(reason)) => {
                        stats.renders_failed += 1;
                        stats.render_failures.push(RecordIssue {
                            row,
                            identifier,
                            reason: reason.clone(),
                        });
                    }
                    None => {}
                }
            }
            ProcessingOutcome::TemplateMissing { .. } => {
                stats.template_missing += 1;
                stats.missing_templates.push(format!(
                    "{} (template: {})",
                    identifier,
                    planned.record.template_name()
                ));
            }
            ProcessingOutcome::NoAttributesFound => {
                stats.no_attributes += 1;
                stats.templates_without_attributes.push(format!(
                    "{} (template: {})",
                    identifier,
                    planned.record.template_name()
                ));
            }
            ProcessingOutcome::ValidationError { reason } => {
                stats.validation_errors += 1;
                stats.invalid_records.push(RecordIssue {
                    row,
                    identifier,
                    reason: reason.clone(),
                });
            }
            ProcessingOutcome::DocumentFailed { reason } => {
                stats.document_errors += 1;
                stats.document_failures.push(RecordIssue {
                    row,
                    identifier,
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Finalizes the statistics.
    pub fn finish(mut self) -> RunStatistics {
        self.stats.renames.sort_by_key(|r| r.row);
        self.stats
    }
}
