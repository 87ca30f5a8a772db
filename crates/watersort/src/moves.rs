//! Legal move enumeration.
//!
//! The order of the returned steps drives the greedy solver, so it is fixed:
//! color groups in the order their color first shows up on top of a tube,
//! then ascending source index, then ascending destination index.

use crate::color::Color;
use crate::puzzle::{Puzzle, Step};
use crate::tube::Tube;

/// Pouring a single-colored tube into an empty one only sets up the reverse
/// pour, so it is never offered.
pub fn is_suppressed_pour(from: &Tube, to: &Tube) -> bool {
    from.is_monocolored() && to.is_empty()
}

/// Whether `to` has room for the whole top run of `from`.
pub fn has_room_for_run(from: &Tube, to: &Tube, depth: usize) -> bool {
    to.free_space(depth) >= from.top_run_len()
}

/// Distinct top colors in first-seen order across the tubes.
fn top_colors(puzzle: &Puzzle) -> Vec<Color> {
    let mut colors = Vec::new();
    for color in puzzle.iter().filter_map(Tube::top_color) {
        if !colors.contains(&color) {
            colors.push(color);
        }
    }
    colors
}

/// Collect every legal single pour for a puzzle whose tubes hold `depth` units.
pub fn collect_moves(puzzle: &Puzzle, depth: usize) -> Vec<Step> {
    let mut steps = Vec::new();

    for color in top_colors(puzzle) {
        // Empty tubes join every color group.
        let candidates: Vec<usize> = puzzle
            .iter()
            .enumerate()
            .filter(|(_, t)| t.top_color().map_or(true, |top| top == color))
            .map(|(i, _)| i)
            .collect();

        for &from in &candidates {
            let source = &puzzle[from];
            if source.is_empty() {
                continue;
            }

            for &to in &candidates {
                if from == to {
                    continue;
                }
                let destination = &puzzle[to];
                if is_suppressed_pour(source, destination) {
                    continue;
                }
                if !has_room_for_run(source, destination, depth) {
                    continue;
                }
                steps.push(Step::new(from, to));
            }
        }
    }

    steps
}
