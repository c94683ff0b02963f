
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use engine::config::parse_connector_mode;
use engine::{ConfigError, Engine, EngineConfig, EventSource, InputEvent, LoadReport, Model, NotFoundError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid model JSON: {0}")]
    InvalidModel(#[from] serde_json::Error),
    #[error("invalid event on line {line}: {source}")]
    InvalidEvent { line: usize, source: serde_json::Error },
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

#[derive(Parser, Debug)]
#[command(name = "isoflow", about = "Load, check and replay isometric diagrams")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a model and report what load-time sanitation changed.
    Validate { model: PathBuf },
    /// Replay recorded input events against a model and print the result.
    Replay(ReplayArgs),
}

#[derive(Args, Debug)]
struct ReplayArgs {
    model: PathBuf,

    #[arg(long, default_value = "-", help = "Event file (JSON lines), or - for stdin")]
    events: String,

    #[arg(long, help = "Write the resulting model here instead of stdout")]
    out: Option<PathBuf>,

    #[arg(long, env = "ISOFLOW_CONNECTOR_MODE", help = "click or drag")]
    connector_mode: Option<String>,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env()?;
    match cli.command {
        Command::Validate { model } => run_validate(&model, config),
        Command::Replay(args) => run_replay(args, config),
    }
}

fn run_validate(path: &Path, config: EngineConfig) -> Result<(), CliError> {
    let (engine, report) = Engine::with_model(read_model(path)?, config);
    print_report(&report);
    for view in &engine.model().views {
        println!(
            "view {} ({}): items={} connectors={} rectangles={} text_boxes={}",
            view.id,
            view.name,
            view.items.len(),
            view.connectors.len(),
            view.rectangles.len(),
            view.text_boxes.len()
        );
    }
    println!("current view: {}", engine.current_view()?.id);
    Ok(())
}

fn run_replay(args: ReplayArgs, mut config: EngineConfig) -> Result<(), CliError> {
    if let Some(mode) = args.connector_mode.as_deref() {
        config.connector_mode = parse_connector_mode(Some(mode))?;
    }
    let (mut engine, report) = Engine::with_model(read_model(&args.model)?, config);
    print_report(&report);

    let reader: Box<dyn BufRead> = if args.events == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&args.events)
            .map_err(|source| CliError::Open { path: PathBuf::from(&args.events), source })?;
        Box::new(BufReader::new(file))
    };
    let handled = replay(&mut engine, reader)?;
    tracing::info!(handled, can_undo = engine.can_undo(), "replay complete");

    let json = serde_json::to_string_pretty(engine.model())?;
    match &args.out {
        Some(path) => fs::write(path, json + "\n")?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

fn read_model(path: &Path) -> Result<Model, CliError> {
    let file = File::open(path).map_err(|source| CliError::Open { path: path.to_path_buf(), source })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn print_report(report: &LoadReport) {
    for (view_id, connector_id) in &report.dropped_connectors {
        eprintln!("dropped connector {connector_id} in view {view_id}: unresolved anchor");
    }
    if report.created_default_view {
        eprintln!("model had no views; added an empty one");
    }
}

/// Feed every event from `reader` to `engine`. Returns how many were handled.
fn replay(engine: &mut Engine, reader: impl BufRead) -> Result<usize, CliError> {
    let mut source = JsonLines::new(reader);
    let handled = engine.pump(&mut source);
    match source.error.take() {
        Some(err) => Err(err),
        None => Ok(handled),
    }
}

/// Newline-delimited JSON [`InputEvent`]s. Blank lines and `#` comments are
/// skipped. The first read or parse failure ends the stream and is kept in
/// `error`.
struct JsonLines<R> {
    reader: R,
    line: usize,
    error: Option<CliError>,
}

impl<R: BufRead> JsonLines<R> {
    fn new(reader: R) -> Self {
        Self { reader, line: 0, error: None }
    }
}

impl<R: BufRead> EventSource for JsonLines<R> {
    fn next_event(&mut self) -> Option<InputEvent> {
        if self.error.is_some() {
            return None;
        }
        let mut buf = String::new();
        loop {
            buf.clear();
            match self.reader.read_line(&mut buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(err) => {
                    self.error = Some(CliError::Io(err));
                    return None;
                }
            }
            let trimmed = buf.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match serde_json::from_str(trimmed) {
                Ok(event) => return Some(event),
                Err(source) => {
                    self.error = Some(CliError::InvalidEvent { line: self.line, source });
                    return None;
                }
            }
        }
    }
}
