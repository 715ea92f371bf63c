//! Types for the batch orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::processor::OutcomeSummary;
use crate::record::SourceError;
use crate::stats::RunStatistics;

/// State of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Validating,
    Grouping,
    Running,
    Completed,
    Cancelled,
    Aborted,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Aborted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Grouping => "grouping",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress event sent to the presentation side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Records are validated and grouped; processing starts.
    Started {
        run_id: Uuid,
        total: usize,
        groups: usize,
    },
    /// A template group starts.
    GroupStarted { template: String, records: usize },
    /// One record was processed.
    RecordProcessed {
        /// 1-based position in processing order.
        index: usize,
        total: usize,
        row: usize,
        identifier: String,
        outcome: OutcomeSummary,
        log_line: String,
    },
    /// The run stopped at a record boundary.
    Cancelled { processed: usize, total: usize },
    /// The run reached a terminal state.
    Finished { state: RunState },
}

/// Final report of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Input file the records came from.
    pub source: String,
    pub statistics: RunStatistics,
    /// Reason of an aborted run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal_error: Option<String>,
}

/// Fatal batch-level errors. Each carries the report of the aborted run.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Required columns are absent from the input.
    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        report: Box<RunReport>,
    },

    /// The input could not be read or decoded.
    #[error("Failed to load records: {source}")]
    Source {
        #[source]
        source: SourceError,
        report: Box<RunReport>,
    },

    /// The output folder could not be created.
    #[error("Failed to create output folder {path}: {source}")]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        report: Box<RunReport>,
    },
}

impl BatchError {
    /// Report of the aborted run.
    pub fn report(&self) -> &RunReport {
        match self {
            Self::MissingColumns { report, .. }
            | Self::Source { report, .. }
            | Self::OutputFolder { report, .. } => report,
        }
    }

    pub fn into_report(self) -> RunReport {
        match self {
            Self::MissingColumns { report, .. }
            | Self::Source { report, .. }
            | Self::OutputFolder { report, .. } => *report,
        }
    }
}
