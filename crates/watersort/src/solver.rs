//! Greedy solver.
//!
//! Repeatedly applies the first legal move until every tube is either empty
//! or full of one color. There is no backtracking, so a puzzle that has a
//! solution can still end up stuck.
//!
//! Every legal move either merges two runs or moves a run from a mixed tube
//! into an empty one. The first lowers the total number of runs and the second
//! lowers the number of empty tubes without raising the run count, so the
//! loop always terminates.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;
use crate::moves::collect_moves;
use crate::puzzle::{Puzzle, Step};

/// Why an analysis did not solve the puzzle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailedReason {
    /// The puzzle was solved
    #[default]
    None,
    /// No legal move was left before reaching the terminal state
    PuzzleInvalid,
    /// A fault was raised while moving liquid around
    UnhandledException,
}

impl fmt::Display for FailedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailedReason::None => "none",
            FailedReason::PuzzleInvalid => "puzzle_invalid",
            FailedReason::UnhandledException => "unhandled_exception",
        };
        f.write_str(name)
    }
}

/// Outcome of one [`analyze`] call.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Whether the terminal state was reached
    pub solved: bool,
    /// Steps taken, only present when solved
    pub steps: Option<Vec<Step>>,
    pub failed_reason: FailedReason,
    pub elapsed: Duration,
    /// Untouched copy of the analyzed puzzle
    pub puzzle: Puzzle,
    /// The fault behind an `UnhandledException` result
    pub fault: Option<PuzzleError>,
}

impl AnalysisResult {
    /// Steps taken; empty when the puzzle was not solved.
    pub fn steps(&self) -> &[Step] {
        self.steps.as_deref().unwrap_or(&[])
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }
}

impl PartialEq for AnalysisResult {
    /// Two results are equal when they describe the same puzzle with the same verdict.
    fn eq(&self, other: &Self) -> bool {
        self.solved == other.solved && self.puzzle == other.puzzle
    }
}

impl Eq for AnalysisResult {}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Puzzle:")?;
        writeln!(f, "{}", self.puzzle)?;
        writeln!(f, "---")?;

        if !self.solved {
            writeln!(f, "Puzzle isn't solved. Reason code: '{}'.", self.failed_reason)?;
            if let Some(fault) = &self.fault {
                writeln!(f, "Unhandled fault: {}", fault)?;
            }
            return Ok(());
        }

        writeln!(f, "Steps:")?;
        let mut replay = self.puzzle.clone();
        for &step in self.steps() {
            let (color, size) = replay
                .tube(step.from)
                .and_then(|t| t.top_color().map(|c| (c, t.top_run_len())))
                .map_or_else(|| ("?".to_string(), 0), |(c, n)| (c.to_string(), n));
            writeln!(f, "{} (color {}, size {})", step, color, size)?;
            if replay.apply(step).is_err() {
                break;
            }
        }
        writeln!(f, "---")?;
        writeln!(f, "Puzzle is solved.")?;
        writeln!(f, "Elapsed time: {:.3}s", self.elapsed.as_secs_f64())
    }
}

/// Run the greedy loop on `playground`, recording each applied step.
///
/// Returns `Ok(true)` once terminal, `Ok(false)` when `next_move` has nothing
/// to offer first.
fn drive<F>(
    mut playground: Puzzle,
    depth: usize,
    steps: &mut Vec<Step>,
    mut next_move: F,
) -> Result<bool, PuzzleError>
where
    F: FnMut(&Puzzle) -> Option<Step>,
{
    while !playground.is_terminal(depth) {
        let step = match next_move(&playground) {
            Some(step) => step,
            None => return Ok(false),
        };
        trace!("step {}: {}", steps.len(), step);
        playground.apply(step)?;
        steps.push(step);
    }
    Ok(true)
}

/// Greedily solve a copy of `puzzle` whose tubes hold `depth` units each.
///
/// The caller's puzzle is never modified, and faults never escape: they come
/// back as an `UnhandledException` result.
pub fn analyze(puzzle: &Puzzle, depth: usize) -> AnalysisResult {
    let start_time = Instant::now();
    let mut steps = Vec::new();

    let outcome = drive(puzzle.clone(), depth, &mut steps, |p| {
        collect_moves(p, depth).into_iter().next()
    });
    let elapsed = start_time.elapsed();

    into_result(puzzle, steps, outcome, elapsed)
}

/// Map the outcome of a greedy run onto the result record.
fn into_result(
    puzzle: &Puzzle,
    steps: Vec<Step>,
    outcome: Result<bool, PuzzleError>,
    elapsed: Duration,
) -> AnalysisResult {
    match outcome {
        Ok(true) => AnalysisResult {
            solved: true,
            steps: Some(steps),
            failed_reason: FailedReason::None,
            elapsed,
            puzzle: puzzle.clone(),
            fault: None,
        },
        Ok(false) => {
            debug!("stuck after {} steps on {}", steps.len(), puzzle);
            AnalysisResult {
                solved: false,
                steps: None,
                failed_reason: FailedReason::PuzzleInvalid,
                elapsed,
                puzzle: puzzle.clone(),
                fault: None,
            }
        }
        Err(fault) => {
            debug!("fault after {} steps on {}: {}", steps.len(), puzzle, fault);
            AnalysisResult {
                solved: false,
                steps: None,
                failed_reason: FailedReason::UnhandledException,
                elapsed,
                puzzle: puzzle.clone(),
                fault: Some(fault),
            }
        }
    }
}

/// Replay `steps` on a copy of `puzzle` and report whether it ends terminal.
pub fn verify_steps(
    puzzle: &Puzzle,
    steps: &[Step],
    depth: usize,
) -> Result<bool, PuzzleError> {
    let mut replay = puzzle.clone();
    for &step in steps {
        replay.apply(step)?;
    }
    Ok(replay.is_terminal(depth))
}
