//! CLI entry point for the water sort solver and generator.
//!
//! Usage:
//!   watersort analyze <puzzle.json> [--depth N]
//!   watersort analyze --stdin [--depth N]
//!   watersort generate --tubes T --colors C [options]
//!
//! A puzzle document looks like `{"depth": 4, "tubes": [[0, 1], [1, 0], []]}`
//! with each tube listed bottom to top.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use watersort::logging::init_logger;
use watersort::{
    analyze, AnalysisResult, CancelToken, FailedReason, Generator, GeneratorConfig, Puzzle,
    PuzzleStats, Step,
};

#[derive(Parser)]
#[command(name = "watersort")]
#[command(about = "Greedy solver and solvable-puzzle generator for water sort puzzles")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle with the greedy solver
    Analyze {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Tube capacity, overriding the document's depth
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Generate a puzzle the greedy solver can solve
    Generate {
        /// Number of tubes
        #[arg(long)]
        tubes: usize,

        /// Number of colors (at most the number of tubes)
        #[arg(long)]
        colors: usize,

        /// Tube capacity
        #[arg(long, default_value = "4")]
        depth: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Random tube swaps applied to each candidate
        #[arg(long, default_value = "10")]
        shuffle_swaps: usize,
    },
}

/// Puzzle input document
#[derive(Debug, Deserialize)]
struct PuzzleDocument {
    #[serde(default)]
    depth: Option<usize>,
    tubes: Puzzle,
}

/// Output format for an analysis
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<FailedReason>,
    steps: Vec<Step>,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault: Option<String>,
}

/// Output format for a generated puzzle
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedOutput {
    depth: usize,
    tubes: Puzzle,
    stats: PuzzleStats,
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.debug);

    match cli.command {
        Commands::Analyze { file, stdin, depth } => {
            let json_content = match read_input(file, stdin) {
                Ok(content) => content,
                Err(e) => fail(&e),
            };

            let document: PuzzleDocument = match serde_json::from_str(&json_content) {
                Ok(d) => d,
                Err(e) => fail(&format!("Error parsing puzzle JSON: {}", e)),
            };

            let depth = match depth.or(document.depth) {
                Some(d) => d,
                None => fail("Error: depth missing from document and --depth"),
            };

            let result = analyze(&document.tubes, depth);
            info!(
                "analyzed {} tubes in {} ms",
                result.puzzle.len(),
                result.elapsed_ms()
            );
            print_json(&format_result(&result));

            process::exit(if result.solved { 0 } else { 1 });
        }

        Commands::Generate {
            tubes,
            colors,
            depth,
            seed,
            timeout,
            shuffle_swaps,
        } => {
            let config = GeneratorConfig {
                shuffle_swaps,
                ..GeneratorConfig::default()
            };
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut generator = Generator::with_rng(rng, config);

            let token = match timeout {
                Some(secs) => CancelToken::with_timeout(Duration::from_secs(secs)),
                None => CancelToken::new(),
            };

            match generator.generate(tubes, colors, depth, &token) {
                Ok(Some(puzzle)) => {
                    let stats = puzzle.stats();
                    print_json(&GeneratedOutput {
                        depth,
                        tubes: puzzle,
                        stats,
                    });
                }
                Ok(None) => {
                    eprintln!("Generation cancelled before a puzzle was accepted");
                    process::exit(1);
                }
                Err(e) if e.is_argument_error() => fail(&format!("Error: {}", e)),
                Err(e) => {
                    eprintln!("Generation failed: {}", e);
                    process::exit(3);
                }
            }
        }
    }
}

fn read_input(file: Option<PathBuf>, stdin: bool) -> Result<String, String> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else if let Some(path) = file {
        fs::read_to_string(&path).map_err(|e| format!("Failed to read file {:?}: {}", path, e))
    } else {
        Err("Error: Must provide either a file path or --stdin".to_string())
    }
}

fn format_result(result: &AnalysisResult) -> AnalysisOutput {
    AnalysisOutput {
        solved: result.solved,
        reason: if result.solved {
            None
        } else {
            Some(result.failed_reason)
        },
        steps: result.steps().to_vec(),
        elapsed_ms: result.elapsed_ms(),
        fault: result.fault.as_ref().map(|f| f.to_string()),
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(&format!("Error serializing output: {}", e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(2);
}
