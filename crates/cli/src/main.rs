use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use supportgen_core::{
    load_config, load_config_or_default, validate_config, BatchOrchestrator, CancelFlag, Config,
    CsvRecordSource, DxfBackend, PdfRenderer, ProgressEvent, RunSettings, RunState,
};

/// Configuration file looked up in the working directory
const DEFAULT_CONFIG_FILE: &str = "supportgen.toml";

/// Buffer size for the progress channel
const PROGRESS_BUFFER_SIZE: usize = 256;

const EXIT_ABORTED: i32 = 2;
const EXIT_CANCELLED: i32 = 130;

/// Generate support drawings from a record sheet
#[derive(Parser, Debug)]
#[command(name = "supportgen")]
#[command(about = "Generate support detail drawings from a record sheet", long_about = None)]
#[command(version)]
struct Cli {
    /// Input sheet (delimited text export)
    input: PathBuf,

    /// Folder holding the drawing templates
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Output folder (default: beside the input sheet)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "SUPPORTGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Render a PDF page for every generated drawing
    #[arg(long)]
    pdf: bool,

    /// Field delimiter of the input sheet
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Also write the text report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Print progress events as JSON lines on stderr
    #[arg(long)]
    events: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Loads the configuration: defaults, file, environment, then flags.
fn load_settings(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => load_config_or_default(Path::new(DEFAULT_CONFIG_FILE))
            .with_context(|| format!("Failed to load config from {:?}", DEFAULT_CONFIG_FILE))?,
    };

    apply_overrides(&mut config, cli);
    validate_config(&config).context("Configuration validation failed")?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(templates) = &cli.templates {
        config.templates.folder = templates.clone();
    }
    if let Some(output) = &cli.output {
        config.output.folder = Some(output.clone());
    }
    if let Some(delimiter) = cli.delimiter {
        config.input.delimiter = delimiter;
    }
    if cli.pdf {
        config.render.enabled = true;
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config = load_settings(&cli)?;
    let settings = RunSettings::from_config(&config, &cli.input);

    info!("Templates: {:?}", settings.template_folder);
    info!("Output: {:?}", settings.output_folder);
    if let Some(folder) = &settings.render_folder {
        info!("PDF pages: {:?}", folder);
    }

    let source = Arc::new(CsvRecordSource::new(&cli.input, config.input.delimiter));
    let orchestrator =
        BatchOrchestrator::new(settings, source, DxfBackend::new(), PdfRenderer::new());
    info!("Run id: {}", orchestrator.run_id());

    let cancel = CancelFlag::new();
    let (progress_tx, mut progress_rx) = mpsc::channel(PROGRESS_BUFFER_SIZE);
    let handle = orchestrator.spawn(Some(progress_tx), cancel.clone());

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut listening = true;

    loop {
        tokio::select! {
            event = progress_rx.recv() => match event {
                Some(event) => show_progress(&event, cli.events),
                None => break,
            },
            result = &mut ctrl_c, if listening => {
                listening = false;
                match result {
                    Ok(()) => {
                        warn!("Cancellation requested, stopping after the current record");
                        cancel.cancel();
                    }
                    Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
                }
            }
        }
    }

    let (report, code) = match handle.await.context("Batch task failed")? {
        Ok(report) => {
            let code = match report.state {
                RunState::Cancelled => EXIT_CANCELLED,
                _ => 0,
            };
            (report, code)
        }
        Err(e) => {
            error!("Batch aborted: {}", e);
            (e.into_report(), EXIT_ABORTED)
        }
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", report.render_text());
    }

    if let Some(path) = &cli.report {
        tokio::fs::write(path, report.render_text())
            .await
            .with_context(|| format!("Failed to write report to {:?}", path))?;
        info!("Report written to {:?}", path);
    }

    Ok(code)
}

fn show_progress(event: &ProgressEvent, as_json: bool) {
    if as_json {
        match serde_json::to_string(event) {
            Ok(line) => eprintln!("{}", line),
            Err(e) => warn!("Failed to serialize progress event: {}", e),
        }
        return;
    }

    match event {
        ProgressEvent::Started { total, groups, .. } => {
            info!("Processing {} records in {} template groups", total, groups)
        }
        ProgressEvent::RecordProcessed {
            index,
            total,
            outcome,
            ..
        } => debug!("Progress {}/{} ({:?})", index, total, outcome),
        ProgressEvent::Cancelled { processed, total } => {
            warn!("Stopped after {} of {} records", processed, total)
        }
        ProgressEvent::GroupStarted { .. } | ProgressEvent::Finished { .. } => {}
    }
}
