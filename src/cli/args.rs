//! Command line argument parsing for the vecscore CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// vecscore - exact vector scoring over binary doc values
#[derive(Parser, Debug, Clone)]
#[command(name = "vecscore")]
#[command(about = "Score stored binary vectors against a query vector")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct VecScoreArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
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

impl VecScoreArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Score a document set against query parameters
    Score(ScoreArgs),

    /// Print the stored-vector encoding of a vector or string as hex
    Encode(EncodeArgs),

    /// Render numbers as an 8-bit-per-number binary string
    #[command(name = "binary-string")]
    BinaryString(BinaryStringArgs),
}

/// Arguments for scoring documents
#[derive(Parser, Debug, Clone)]
pub struct ScoreArgs {
    /// Query parameter file (JSON object with field, vector/value, ...)
    #[arg(value_name = "PARAMS_FILE")]
    pub params_file: PathBuf,

    /// Document file (JSON with segments of documents)
    #[arg(value_name = "DOCUMENT_FILE")]
    pub document_file: PathBuf,

    /// Scoring method; when absent the script source path is used
    #[arg(short, long)]
    pub method: Option<String>,

    /// Script source identifier to compile
    #[arg(long)]
    pub script: Option<String>,

    /// Engine configuration file (JSON)
    #[arg(short, long, env = "VECSCORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Maximum number of results to return
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Minimum score threshold for results
    #[arg(long)]
    pub min_score: Option<f64>,
}

/// Arguments for encoding a stored vector
#[derive(Parser, Debug, Clone)]
pub struct EncodeArgs {
    /// Vector elements
    #[arg(value_name = "VALUES", allow_negative_numbers = true, conflicts_with = "text")]
    pub values: Vec<f64>,

    /// Encode a string as UTF-16 code units instead
    #[arg(long)]
    pub text: Option<String>,
}

/// Arguments for the binary string helper
#[derive(Parser, Debug, Clone)]
pub struct BinaryStringArgs {
    /// Numbers to render
    #[arg(value_name = "VALUES", required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
