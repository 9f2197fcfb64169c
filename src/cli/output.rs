//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, VecScoreArgs};
use crate::error::Result;

/// One scored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub segment: usize,
    pub doc_id: u32,
    pub score: f64,
}

/// Result structure for the score command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreResults {
    pub field: String,
    pub method: String,
    pub hits: Vec<ScoredDocument>,
    pub total_candidates: usize,
    pub duration_ms: u64,
}

/// Result structure for the encode command.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncodeResult {
    pub byte_length: usize,
    pub hex: String,
}

/// Result structure for the binary-string command.
#[derive(Debug, Serialize, Deserialize)]
pub struct BinaryStringResult {
    pub bits: String,
}

/// Human-readable rendering of a command result.
pub trait HumanOutput {
    fn print_human(&self, args: &VecScoreArgs);
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &VecScoreArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            result.print_human(args);
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &VecScoreArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

impl HumanOutput for ScoreResults {
    fn print_human(&self, args: &VecScoreArgs) {
        if args.verbosity() > 0 {
            println!("Scores for field [{}] ({}):", self.field, self.method);
            println!("═══════════════");
        }

        for (rank, hit) in self.hits.iter().enumerate() {
            println!(
                "{:>3}. segment {} doc {:<6} score {:.6}",
                rank + 1,
                hit.segment,
                hit.doc_id,
                hit.score
            );
        }

        if args.verbosity() > 1 {
            println!();
            println!("Candidates scored: {}", self.total_candidates);
            println!("Scoring time: {}ms", self.duration_ms);
        }
    }
}

impl HumanOutput for EncodeResult {
    fn print_human(&self, args: &VecScoreArgs) {
        if args.verbosity() > 1 {
            println!("Payload bytes: {}", self.byte_length);
        }
        println!("{}", self.hex);
    }
}

impl HumanOutput for BinaryStringResult {
    fn print_human(&self, _args: &VecScoreArgs) {
        println!("{}", self.bits);
    }
}
