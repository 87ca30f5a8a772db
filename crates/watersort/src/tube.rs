//! A single tube: a last-in-first-out stack of color units.
//!
//! Capacity is not stored on the tube. Every operation that cares about it
//! takes the puzzle's `depth` as an argument, so the same type serves puzzles
//! of any depth.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::color::Color;
use crate::error::TubeError;

/// Units are stored bottom to top; the last element is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tube {
    items: SmallVec<[Color; 8]>,
}

impl Tube {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tube from units listed bottom to top.
    pub fn from_colors<I>(colors: I) -> Self
    where
        I: IntoIterator<Item = Color>,
    {
        Self {
            items: colors.into_iter().collect(),
        }
    }

    /// A tube holding `count` units of a single color.
    pub fn filled(color: Color, count: usize) -> Self {
        let mut tube = Self::new();
        tube.push(color, count);
        tube
    }

    /// Units bottom to top.
    pub fn colors(&self) -> &[Color] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self, depth: usize) -> bool {
        self.items.len() >= depth
    }

    /// Units that can still be poured in before reaching `depth`.
    pub fn free_space(&self, depth: usize) -> usize {
        depth.saturating_sub(self.items.len())
    }

    pub fn top_color(&self) -> Option<Color> {
        self.items.last().copied()
    }

    /// Number of contiguous units of the top color.
    pub fn top_run_len(&self) -> usize {
        match self.top_color() {
            Some(top) => self.items.iter().rev().take_while(|&&c| c == top).count(),
            None => 0,
        }
    }

    /// True when every unit has the same color. An empty tube qualifies.
    pub fn is_monocolored(&self) -> bool {
        match self.items.first() {
            Some(&first) => self.items.iter().all(|&c| c == first),
            None => true,
        }
    }

    /// True when the tube holds exactly one distinct color.
    pub fn is_solved(&self) -> bool {
        !self.is_empty() && self.is_monocolored()
    }

    /// Distinct colors in the order they first appear from the bottom.
    pub fn distinct_colors(&self) -> Vec<Color> {
        let mut seen = Vec::new();
        for &color in &self.items {
            if !seen.contains(&color) {
                seen.push(color);
            }
        }
        seen
    }

    /// Number of units of each color.
    pub fn color_counts(&self) -> BTreeMap<Color, usize> {
        let mut counts = BTreeMap::new();
        for &color in &self.items {
            *counts.entry(color).or_insert(0) += 1;
        }
        counts
    }

    /// Length of the first contiguous block of each color, scanning from the bottom.
    ///
    /// Later blocks of a color that already appeared are not measured.
    pub fn first_run_lengths(&self) -> BTreeMap<Color, usize> {
        let mut runs = BTreeMap::new();
        let mut i = 0;
        while i < self.items.len() {
            let color = self.items[i];
            let run = self.items[i..].iter().take_while(|&&c| c == color).count();
            runs.entry(color).or_insert(run);
            i += run;
        }
        runs
    }

    /// Put `count` units of `color` on top.
    pub fn push(&mut self, color: Color, count: usize) {
        self.items.extend(std::iter::repeat(color).take(count));
    }

    /// Remove exactly `count` units from the top and return their color.
    ///
    /// The tube is left untouched when the top `count` units are not one color
    /// or when there are fewer than `count` units.
    pub fn pop(&mut self, count: usize) -> Result<Color, TubeError> {
        if count == 0 {
            return Err(TubeError::ZeroCount);
        }
        let available = self.items.len();
        if available < count {
            return Err(TubeError::NotEnoughUnits {
                requested: count,
                available,
            });
        }
        let color = self.items[available - 1];
        if self.items[available - count..].iter().any(|&c| c != color) {
            return Err(TubeError::MixedRun { requested: count });
        }
        self.items.truncate(available - count);
        Ok(color)
    }

    /// Remove the whole top run and return its color and length.
    ///
    /// Returns `None` on an empty tube.
    pub fn pop_run(&mut self) -> Option<(Color, usize)> {
        let color = self.top_color()?;
        let run = self.top_run_len();
        self.items.truncate(self.items.len() - run);
        Some((color, run))
    }
}

impl fmt::Display for Tube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, color) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", color)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tube(ids: &[u8]) -> Tube {
        Tube::from_colors(ids.iter().copied().map(Color::new))
    }

    #[test]
    fn test_top_run_len() {
        assert_eq!(tube(&[]).top_run_len(), 0);
        assert_eq!(tube(&[0, 1, 1]).top_run_len(), 2);
        assert_eq!(tube(&[1, 1, 0]).top_run_len(), 1);
        assert_eq!(tube(&[2, 2, 2]).top_run_len(), 3);
    }

    #[test]
    fn test_top_color_empty() {
        assert_eq!(tube(&[]).top_color(), None);
        assert_eq!(tube(&[0, 3]).top_color(), Some(Color::new(3)));
    }

    #[test]
    fn test_monocolored_and_solved() {
        assert!(tube(&[]).is_monocolored());
        assert!(!tube(&[]).is_solved());
        assert!(tube(&[4, 4]).is_monocolored());
        assert!(tube(&[4, 4]).is_solved());
        assert!(!tube(&[4, 1]).is_monocolored());
    }

    #[test]
    fn test_pop_exact_run() {
        let mut t = tube(&[0, 1, 1]);
        assert_eq!(t.pop(2), Ok(Color::new(1)));
        assert_eq!(t, tube(&[0]));
    }

    #[test]
    fn test_pop_mixed_run_leaves_tube_untouched() {
        let mut t = tube(&[0, 1, 1]);
        assert_eq!(t.pop(3), Err(TubeError::MixedRun { requested: 3 }));
        assert_eq!(t, tube(&[0, 1, 1]));
    }

    #[test]
    fn test_pop_too_many_units() {
        let mut t = tube(&[2]);
        assert_eq!(
            t.pop(2),
            Err(TubeError::NotEnoughUnits {
                requested: 2,
                available: 1
            })
        );
        assert_eq!(
            tube(&[]).pop(1),
            Err(TubeError::NotEnoughUnits {
                requested: 1,
                available: 0
            })
        );
        assert_eq!(t.pop(0), Err(TubeError::ZeroCount));
    }

    #[test]
    fn test_pop_run() {
        let mut t = tube(&[0, 2, 2, 2]);
        assert_eq!(t.pop_run(), Some((Color::new(2), 3)));
        assert_eq!(t.pop_run(), Some((Color::new(0), 1)));
        assert_eq!(t.pop_run(), None);
    }

    #[test]
    fn test_push_then_len() {
        let mut t = Tube::new();
        t.push(Color::new(5), 3);
        assert_eq!(t.len(), 3);
        assert!(t.is_full(3));
        assert_eq!(t.free_space(4), 1);
        assert_eq!(t.free_space(2), 0);
    }

    #[test]
    fn test_distinct_colors_first_seen_order() {
        assert_eq!(
            tube(&[3, 1, 3, 0]).distinct_colors(),
            vec![Color::new(3), Color::new(1), Color::new(0)]
        );
    }

    #[test]
    fn test_color_counts() {
        let counts = tube(&[3, 1, 3, 3]).color_counts();
        assert_eq!(counts[&Color::new(3)], 3);
        assert_eq!(counts[&Color::new(1)], 1);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_first_run_lengths_ignore_later_blocks() {
        let runs = tube(&[0, 0, 1, 0, 0, 0]).first_run_lengths();
        assert_eq!(runs[&Color::new(0)], 2);
        assert_eq!(runs[&Color::new(1)], 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = tube(&[0, 1]);
        let mut copy = original.clone();
        copy.push(Color::new(1), 1);
        assert_eq!(original, tube(&[0, 1]));
        assert_ne!(original, copy);
    }

    #[test]
    fn test_display() {
        assert_eq!(tube(&[0, 1, 1]).to_string(), "[0, 1, 1]");
        assert_eq!(tube(&[]).to_string(), "[]");
    }
}
