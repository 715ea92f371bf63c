pub mod collision;
pub mod config;
pub mod document;
pub mod dxf;
pub mod normalize;
pub mod orchestrator;
pub mod processor;
pub mod record;
pub mod render;
pub mod stats;
pub mod template;
pub mod testing;

pub use collision::{resolve_identifier, IdentifierRegistry, ResolvedIdentifier};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError,
};
pub use document::{DocumentBackend, DocumentError, DxfBackend, PopulateJob, PopulateResult};
pub use normalize::{normalize, AttributeSet, FieldKind};
pub use orchestrator::{
    BatchError, BatchOrchestrator, CancelFlag, ProgressEvent, RunReport, RunSettings, RunState,
};
pub use processor::{OutcomeSummary, ProcessingOutcome, RecordProcessor, RenderStatus};
pub use record::{CsvRecordSource, RawValue, Record, RecordBatch, RecordSource, SourceError};
pub use render::{PdfRenderer, RenderError, RenderJob, RenderResult, Renderer};
pub use stats::{RunStatistics, StatsAggregator};
pub use template::{TemplateLookup, TemplateResolver};
