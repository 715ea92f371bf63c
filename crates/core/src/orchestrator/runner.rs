//! Batch orchestrator implementation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::collision::IdentifierRegistry;
use crate::document::DocumentBackend;
use crate::processor::{
    validate_record, PlannedRecord, ProcessContext, RecordPlan, RecordProcessor, RenderTarget,
};
use crate::record::{Record, RecordSource};
use crate::render::Renderer;
use crate::stats::{RunStatistics, StatsAggregator};
use crate::template::{TemplateLookup, TemplateResolver};

use super::cancel::CancelFlag;
use super::config::RunSettings;
use super::grouping::{group_by_template, TemplateGroup};
use super::types::{BatchError, ProgressEvent, RunReport, RunState};

/// Runs one batch: validation, grouping, sequential record processing.
///
/// `run` consumes the orchestrator, so an instance serves exactly one run.
pub struct BatchOrchestrator<D: DocumentBackend, R: Renderer> {
    run_id: Uuid,
    settings: RunSettings,
    source: Arc<dyn RecordSource>,
    resolver: TemplateResolver,
    processor: RecordProcessor<D, R>,
    state: RunState,
    started_at: DateTime<Utc>,
    progress: Option<mpsc::Sender<ProgressEvent>>,
}

impl<D, R> BatchOrchestrator<D, R>
where
    D: DocumentBackend + 'static,
    R: Renderer + 'static,
{
    pub fn new(settings: RunSettings, source: Arc<dyn RecordSource>, backend: D, renderer: R) -> Self {
        let resolver = TemplateResolver::new(
            settings.template_folder.clone(),
            settings.template_extension.clone(),
        );

        Self {
            run_id: Uuid::new_v4(),
            settings,
            source,
            resolver,
            processor: RecordProcessor::new(backend, renderer),
            state: RunState::Idle,
            started_at: Utc::now(),
            progress: None,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs the batch on a dedicated task.
    pub fn spawn(
        self,
        progress: Option<mpsc::Sender<ProgressEvent>>,
        cancel: CancelFlag,
    ) -> JoinHandle<Result<RunReport, BatchError>> {
        tokio::spawn(self.run(progress, cancel))
    }

    /// Runs the batch to a terminal state.
    ///
    /// Returns the report of a completed or cancelled run; an aborted run is
    /// returned as `BatchError`, which carries its report.
    pub async fn run(
        mut self,
        progress: Option<mpsc::Sender<ProgressEvent>>,
        cancel: CancelFlag,
    ) -> Result<RunReport, BatchError> {
        self.progress = progress;
        let span = info_span!("run", run_id = %self.run_id);
        self.execute(cancel).instrument(span).await
    }

    async fn execute(&mut self, cancel: CancelFlag) -> Result<RunReport, BatchError> {
        self.started_at = Utc::now();
        info!(
            source = self.source.name(),
            input = %self.settings.input.display(),
            "Starting run"
        );

        self.transition(RunState::Validating);
        let mut batch = match self.source.load().await {
            Ok(batch) => batch,
            Err(e) => {
                error!("Failed to load records: {}", e);
                let report = self.abort(e.to_string()).await;
                return Err(BatchError::Source {
                    source: e,
                    report: Box::new(report),
                });
            }
        };

        if batch.apply_template_alias() {
            info!("Using column 'Name' as 'TipoSuporte'");
        }

        let missing = batch.missing_columns();
        if !missing.is_empty() {
            let message = format!("Missing required columns: {}", missing.join(", "));
            error!("{}", message);
            let report = self.abort(message).await;
            return Err(BatchError::MissingColumns {
                missing,
                report: Box::new(report),
            });
        }

        self.transition(RunState::Grouping);
        let groups = group_by_template(&batch.records);
        let lookups = self.resolve_templates(&groups).await;
        let planned = plan_records(batch.records, &groups, &lookups);
        debug!(records = planned.len(), groups = groups.len(), "Records planned");

        if let Err(e) = tokio::fs::create_dir_all(&self.settings.output_folder).await {
            let message = format!(
                "Failed to create output folder {}: {}",
                self.settings.output_folder.display(),
                e
            );
            error!("{}", message);
            let report = self.abort(message).await;
            return Err(BatchError::OutputFolder {
                path: self.settings.output_folder.clone(),
                source: e,
                report: Box::new(report),
            });
        }

        self.transition(RunState::Running);
        let total = planned.len();
        let ctx = ProcessContext {
            output_folder: self.settings.output_folder.clone(),
            output_extension: self.settings.output_extension.clone(),
            date_stamp: self.settings.date_stamp(Local::now()),
            render: self
                .settings
                .render_folder
                .clone()
                .map(|folder| RenderTarget { folder }),
        };
        let mut stats = StatsAggregator::new(total, groups.len());

        self.emit(ProgressEvent::Started {
            run_id: self.run_id,
            total,
            groups: groups.len(),
        })
        .await;

        let mut index = 0;
        let mut cancelled = false;

        'groups: for group in &groups {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            info!(
                template = %group.template,
                records = group.members.len(),
                "Processing template group"
            );
            self.emit(ProgressEvent::GroupStarted {
                template: group.template.clone(),
                records: group.members.len(),
            })
            .await;

            for &member in &group.members {
                if cancel.is_cancelled() {
                    cancelled = true;
                    break 'groups;
                }

                let current = &planned[member];
                let outcome = self.processor.process(current, &ctx).await;
                let log_line = RecordProcessor::<D, R>::log_outcome(current, &outcome);
                stats.observe(current, &outcome);
                index += 1;

                self.emit(ProgressEvent::RecordProcessed {
                    index,
                    total,
                    row: current.record.row,
                    identifier: current.identifier(),
                    outcome: outcome.summary(),
                    log_line,
                })
                .await;
            }
        }

        let state = if cancelled {
            warn!(processed = index, total, "Run cancelled");
            self.emit(ProgressEvent::Cancelled {
                processed: index,
                total,
            })
            .await;
            RunState::Cancelled
        } else {
            RunState::Completed
        };

        self.transition(state);
        let report = self.report(stats.finish(), None);
        info!(
            state = %report.state,
            processed = report.statistics.processed,
            success = report.statistics.success,
            failed = report.statistics.failed(),
            duplicates = report.statistics.duplicates,
            "Run finished"
        );
        self.emit(ProgressEvent::Finished { state }).await;

        Ok(report)
    }

    /// Resolves each group's template once. Groups without a template name
    /// get no lookup; their records fail validation.
    async fn resolve_templates(&self, groups: &[TemplateGroup]) -> Vec<Option<TemplateLookup>> {
        let mut lookups = Vec::with_capacity(groups.len());
        for group in groups {
            if group.template.is_empty() {
                lookups.push(None);
                continue;
            }

            let lookup = self.resolver.resolve(&group.template).await;
            if let TemplateLookup::Missing { expected } = &lookup {
                warn!(
                    template = %group.template,
                    records = group.members.len(),
                    "Template not found: {}",
                    expected.display()
                );
            }
            lookups.push(Some(lookup));
        }
        lookups
    }

    async fn abort(&mut self, reason: String) -> RunReport {
        self.transition(RunState::Aborted);
        let report = self.report(RunStatistics::default(), Some(reason));
        self.emit(ProgressEvent::Finished {
            state: RunState::Aborted,
        })
        .await;
        report
    }

    fn report(&self, statistics: RunStatistics, fatal_error: Option<String>) -> RunReport {
        RunReport {
            run_id: self.run_id,
            state: self.state,
            started_at: self.started_at,
            finished_at: Utc::now(),
            source: self.settings.input.display().to_string(),
            statistics,
            fatal_error,
        }
    }

    fn transition(&mut self, next: RunState) {
        if self.state.is_terminal() {
            warn!("Ignoring transition {} -> {} from a terminal state", self.state, next);
            return;
        }
        debug!("State {} -> {}", self.state, next);
        self.state = next;
    }

    /// Sends a progress event. A dropped receiver never stops the run.
    async fn emit(&self, event: ProgressEvent) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event).await;
        }
    }
}

/// Plans every record in input order: validation, template lookup of its
/// group, then identifier resolution. Only records that will reach the
/// document backend claim an identifier.
fn plan_records(
    records: Vec<Record>,
    groups: &[TemplateGroup],
    lookups: &[Option<TemplateLookup>],
) -> Vec<PlannedRecord> {
    let group_of: HashMap<usize, usize> = groups
        .iter()
        .enumerate()
        .flat_map(|(g, group)| group.members.iter().map(move |&member| (member, g)))
        .collect();

    let mut registry = IdentifierRegistry::new();

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let lookup = group_of
                .get(&index)
                .and_then(|&g| lookups.get(g))
                .and_then(Option::as_ref);

            let plan = match (validate_record(&record), lookup) {
                (Err(reason), _) => RecordPlan::Invalid(reason),
                (Ok(()), Some(TemplateLookup::Found(template))) => RecordPlan::Ready {
                    template: template.clone(),
                    identifier: registry.claim(&record.declared_id()),
                },
                (Ok(()), Some(TemplateLookup::Missing { expected })) => {
                    RecordPlan::TemplateMissing {
                        expected: expected.clone(),
                    }
                }
                (Ok(()), None) => {
                    RecordPlan::Invalid("blank template name (TipoSuporte)".to_string())
                }
            };

            PlannedRecord { record, plan }
        })
        .collect()
}
