//! Command-line harness for asset validation
//!
//! Validates one archive against a scene dump written by the external FBX
//! importer and prints the outcome as JSON or as a one-line-per-check
//! summary. Logs go to stderr.

#![forbid(unsafe_code)]

use arch_asset_check::{CheckConfig, Outcome, Pipeline, SceneDumpImporter};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Output rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Full JSON outcome
    Json,
    /// One line per check
    Summary,
}

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Asset archive to validate
    #[arg(value_name = "ARCHIVE")]
    archive: PathBuf,

    /// Scene dump written by the importer for this archive
    #[arg(short, long, value_name = "SCENE_DUMP")]
    scene: PathBuf,

    /// JSON file overriding check limits
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the outcome here instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<u8, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => CheckConfig::from_json_file(path)?,
        None => CheckConfig::default(),
    };
    let mut pipeline = Pipeline::new(config, SceneDumpImporter::new(&args.scene));

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    let outcome = match args.format {
        Format::Json => pipeline.validate(&args.archive, &mut sink)?,
        Format::Summary => {
            let outcome = pipeline.run(&args.archive);
            write_summary(&outcome, &mut sink)?;
            outcome
        }
    };
    sink.flush()?;
    Ok(outcome.exit_code())
}

fn write_summary<W: Write>(outcome: &Outcome, out: &mut W) -> io::Result<()> {
    let report = match outcome {
        Outcome::Report(report) => report,
        Outcome::Error { error } => return writeln!(out, "error: {}", error),
    };
    for (id, finding) in report.findings() {
        writeln!(out, "[{}] {} {}", id.issue_kind().label(), id, finding.status)?;
        if finding.status.is_failure() {
            for message in &finding.messages {
                writeln!(out, "    {}", message)?;
            }
        }
    }
    writeln!(out, "[NamingError] naming {}", report.naming.status)
}
