//! Puzzle representation: a fixed row of tubes plus single-pour steps.
//!
//! Puzzles serialize as a JSON array of tubes, each tube an array of color
//! numbers listed bottom to top, e.g. `[[0, 1], [1, 0], []]`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::PuzzleError;
use crate::tube::Tube;

/// One pour: the whole top run of `from` goes onto `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    pub from: usize,
    pub to: usize,
}

impl Step {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] -> [{}]", self.from, self.to)
    }
}

/// A fixed number of tubes whose contents change in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Puzzle {
    tubes: Vec<Tube>,
}

impl Puzzle {
    pub fn new(tubes: Vec<Tube>) -> Self {
        Self { tubes }
    }

    /// Number of tubes.
    pub fn len(&self) -> usize {
        self.tubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tubes.is_empty()
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    pub fn tube(&self, index: usize) -> Option<&Tube> {
        self.tubes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tube> {
        self.tubes.iter()
    }

    /// Every tube is empty or holds a single color, whatever its fill level.
    pub fn is_solved(&self) -> bool {
        self.tubes.iter().all(|t| t.is_empty() || t.is_monocolored())
    }

    /// Every tube is empty or filled to `depth` with a single color.
    ///
    /// Stricter than [`Puzzle::is_solved`]: a partially filled monocolored
    /// tube does not count.
    pub fn is_terminal(&self, depth: usize) -> bool {
        self.is_solved()
            && self
                .tubes
                .iter()
                .all(|t| t.is_empty() || t.len() == depth)
    }

    /// Pour the top run of `step.from` onto `step.to` without any legality check.
    pub fn apply(&mut self, step: Step) -> Result<(), PuzzleError> {
        let len = self.tubes.len();
        for index in [step.from, step.to] {
            if index >= len {
                return Err(PuzzleError::TubeOutOfRange { index, len });
            }
        }

        let (color, count) = self.tubes[step.from]
            .pop_run()
            .ok_or(PuzzleError::EmptySource { index: step.from })?;
        self.tubes[step.to].push(color, count);
        Ok(())
    }

    /// All colors present anywhere in the puzzle.
    pub fn colors(&self) -> BTreeSet<Color> {
        self.tubes
            .iter()
            .flat_map(|t| t.colors().iter().copied())
            .collect()
    }

    /// For each color, the ascending indices of the tubes that hold it.
    pub fn color_distribution(&self) -> BTreeMap<Color, Vec<usize>> {
        let mut distribution: BTreeMap<Color, Vec<usize>> = BTreeMap::new();
        for (index, tube) in self.tubes.iter().enumerate() {
            for color in tube.distinct_colors() {
                distribution.entry(color).or_default().push(index);
            }
        }
        distribution
    }

    /// Maps "number of distinct colors in a tube" to how many tubes have it.
    pub fn color_count_histogram(&self) -> BTreeMap<usize, usize> {
        let mut histogram = BTreeMap::new();
        for tube in &self.tubes {
            *histogram.entry(tube.distinct_colors().len()).or_insert(0) += 1;
        }
        histogram
    }

    pub fn stats(&self) -> PuzzleStats {
        let mut run_length_histogram = BTreeMap::new();
        for tube in &self.tubes {
            for run in tube.first_run_lengths().into_values() {
                *run_length_histogram.entry(run).or_insert(0) += 1;
            }
        }

        PuzzleStats {
            tubes: self.len(),
            colors: self.colors().len(),
            empty_tubes: self.tubes.iter().filter(|t| t.is_empty()).count(),
            color_count_histogram: self.color_count_histogram(),
            run_length_histogram,
        }
    }
}

impl From<Vec<Tube>> for Puzzle {
    fn from(tubes: Vec<Tube>) -> Self {
        Self::new(tubes)
    }
}

impl Index<usize> for Puzzle {
    type Output = Tube;

    fn index(&self, index: usize) -> &Tube {
        &self.tubes[index]
    }
}

impl<'a> IntoIterator for &'a Puzzle {
    type Item = &'a Tube;
    type IntoIter = std::slice::Iter<'a, Tube>;

    fn into_iter(self) -> Self::IntoIter {
        self.tubes.iter()
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, tube) in self.tubes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", tube)?;
        }
        write!(f, "]")
    }
}

/// Shape statistics of one puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleStats {
    pub tubes: usize,
    pub colors: usize,
    pub empty_tubes: usize,
    /// Distinct colors per tube -> number of tubes
    pub color_count_histogram: BTreeMap<usize, usize>,
    /// First-run length -> number of such runs across all tubes
    pub run_length_histogram: BTreeMap<usize, usize>,
}
