//! Stopsig CLI - command-line interface for the SSRT engine
//!
//! Commands:
//! - compute: Process a directory of participant CSVs into a result table
//! - validate: Load a directory and report per-participant diagnostics

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use stopsig::pipeline::SsrtProcessor;
use stopsig::types::TaskProtocol;
use stopsig::{loader, ReportEncoder, SsrtError, ENGINE_VERSION};

/// Stopsig - compute SSRT estimates from stop-signal task data
#[derive(Parser)]
#[command(name = "stopsig")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Compute SSRT estimates from stop-signal task data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the result table for a directory of participant CSVs
    Compute {
        /// Directory containing per-participant CSV exports
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "csv")]
        format: OutputFormat,

        /// Number of go trials in the protocol
        #[arg(long, default_value = "150")]
        go_trials: u32,

        /// Number of stop trials in the protocol
        #[arg(long, default_value = "50")]
        nogo_trials: u32,

        /// Leading practice rows to discard from each file
        #[arg(long, default_value = "24")]
        practice_rows: usize,
    },

    /// Load a directory and report per-participant trial counts and flags
    Validate {
        /// Directory containing per-participant CSV exports
        #[arg(short, long)]
        input: PathBuf,

        /// Leading practice rows to discard from each file
        #[arg(long, default_value = "24")]
        practice_rows: usize,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Flat table with the fixed output column order
    Csv,
    /// Full report payload (producer metadata + rows)
    Json,
    /// Pretty-printed report payload
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StopsigCliError> {
    match cli.command {
        Commands::Compute {
            input,
            output,
            format,
            go_trials,
            nogo_trials,
            practice_rows,
        } => {
            let protocol = TaskProtocol {
                go_trials,
                nogo_trials,
                practice_rows,
                ..TaskProtocol::default()
            };
            cmd_compute(&input, &output, format, protocol)
        }

        Commands::Validate {
            input,
            practice_rows,
            json,
        } => {
            let protocol = TaskProtocol {
                practice_rows,
                ..TaskProtocol::default()
            };
            cmd_validate(&input, protocol, json)
        }
    }
}

fn cmd_compute(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    protocol: TaskProtocol,
) -> Result<(), StopsigCliError> {
    let datasets = loader::load_dir(input, &protocol)?;

    let processor = SsrtProcessor::with_protocol(protocol);
    let table = processor.process_batch(&datasets);

    let encoder = ReportEncoder::new();
    let output_data = match format {
        OutputFormat::Csv => encoder.encode_to_csv(&table)?,
        OutputFormat::Json => {
            // Readable by default when a human is looking at the terminal
            if output.to_string_lossy() == "-" && atty::is(atty::Stream::Stdout) {
                encoder.encode_to_json(&table, processor.protocol())?
            } else {
                serde_json::to_string(&encoder.encode(&table, processor.protocol()))?
            }
        }
        OutputFormat::JsonPretty => encoder.encode_to_json(&table, processor.protocol())?,
    };

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_validate(input: &Path, protocol: TaskProtocol, json: bool) -> Result<(), StopsigCliError> {
    let datasets = loader::load_dir(input, &protocol)?;
    let processor = SsrtProcessor::with_protocol(protocol);

    let participants: Vec<ParticipantCheck> = datasets
        .iter()
        .map(|dataset| {
            let result = processor.process_participant(dataset);
            ParticipantCheck {
                id: dataset.id,
                trials: dataset.trials.len(),
                flags: result.flags.iter().map(|f| f.as_str().to_string()).collect(),
            }
        })
        .collect();

    let flagged = participants.iter().filter(|p| !p.flags.is_empty()).count();
    let report = ValidationReport {
        total_participants: participants.len(),
        flagged_participants: flagged,
        participants,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Participants: {}", report.total_participants);
        println!("Flagged:      {}", report.flagged_participants);

        for participant in &report.participants {
            if participant.flags.is_empty() {
                println!("  - {} ({} trials): ok", participant.id, participant.trials);
            } else {
                println!(
                    "  - {} ({} trials): {}",
                    participant.id,
                    participant.trials,
                    participant.flags.join(", ")
                );
            }
        }
    }

    if flagged > 0 {
        Err(StopsigCliError::ValidationFailed(flagged))
    } else {
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum StopsigCliError {
    Io(io::Error),
    Engine(SsrtError),
    Json(serde_json::Error),
    ValidationFailed(usize),
}

impl From<io::Error> for StopsigCliError {
    fn from(e: io::Error) -> Self {
        StopsigCliError::Io(e)
    }
}

impl From<SsrtError> for StopsigCliError {
    fn from(e: SsrtError) -> Self {
        StopsigCliError::Engine(e)
    }
}

impl From<serde_json::Error> for StopsigCliError {
    fn from(e: serde_json::Error) -> Self {
        StopsigCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<StopsigCliError> for CliError {
    fn from(e: StopsigCliError) -> Self {
        match e {
            StopsigCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            StopsigCliError::Engine(e) => CliError {
                code: "ENGINE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check that input files are participant CSV exports".to_string()),
            },
            StopsigCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            StopsigCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} participants carry reliability flags", count),
                hint: Some("Review flagged participants before exporting".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_participants: usize,
    flagged_participants: usize,
    participants: Vec<ParticipantCheck>,
}

#[derive(serde::Serialize)]
struct ParticipantCheck {
    id: u32,
    trials: usize,
    flags: Vec<String>,
}
