//! Water sort puzzle library.
//!
//! This crate models tubes of stacked liquid colors, enumerates legal pours,
//! solves puzzles with a deterministic greedy search, and generates random
//! puzzles that this solver is guaranteed to solve.

pub mod cancel;
pub mod color;
pub mod error;
pub mod generator;
pub mod logging;
pub mod moves;
pub mod puzzle;
pub mod solver;
pub mod tube;

// Re-export main types
pub use cancel::CancelToken;
pub use color::Color;
pub use error::{GenerateError, PuzzleError, TubeError};
pub use generator::{Generator, GeneratorConfig};
pub use moves::collect_moves;
pub use puzzle::{Puzzle, PuzzleStats, Step};
pub use solver::{analyze, verify_steps, AnalysisResult, FailedReason};
pub use tube::Tube;
