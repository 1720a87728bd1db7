//! Command line argument parsing for the moodlens CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_ARTIFACT_PATH;

/// moodlens - emotion labels and dashboard statistics for feedback comments
#[derive(Parser, Debug, Clone)]
#[command(name = "moodlens")]
#[command(about = "Emotion classification and statistics for feedback comments")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MoodlensArgs {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl MoodlensArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// Default log directive for this verbosity; `RUST_LOG` takes precedence.
    pub fn log_directive(&self) -> &'static str {
        match self.verbosity() {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from a labeled CSV corpus
    Train(TrainArgs),

    /// Predict the emotion of one or more comments
    Predict(PredictArgs),

    /// Label a comment and record it in a feedback store
    Submit(SubmitArgs),

    /// Show dashboard statistics for a feedback store
    Stats(StatsArgs),
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Train(_) => "train",
            Command::Predict(_) => "predict",
            Command::Submit(_) => "submit",
            Command::Stats(_) => "stats",
        }
    }
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// CSV file with a text-like and an emotion-like column
    #[arg(value_name = "CORPUS")]
    pub corpus: PathBuf,

    /// Where to write the model (overrides the config file)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Training configuration file (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Model artifact path
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    pub model: PathBuf,

    /// Comments to classify
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,
}

/// Arguments for submitting feedback
#[derive(Parser, Debug, Clone)]
pub struct SubmitArgs {
    /// Feedback store file (JSON lines)
    #[arg(short, long, value_name = "FILE")]
    pub store: PathBuf,

    /// Model artifact path
    #[arg(short, long, default_value = DEFAULT_ARTIFACT_PATH)]
    pub model: PathBuf,

    /// Author of the comment
    #[arg(short, long)]
    pub username: String,

    /// Numeric rating
    #[arg(short, long, allow_negative_numbers = true)]
    pub rating: i64,

    /// Comment text
    #[arg(value_name = "COMMENT")]
    pub comment: String,
}

/// Arguments for statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Feedback store file (JSON lines)
    #[arg(short, long, value_name = "FILE")]
    pub store: PathBuf,

    /// Maximum number of recent reviews to list
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
