//! Random puzzle generation.
//!
//! A candidate starts from the sorted state and is scrambled with reversed
//! pours, so it is built backwards from a solution. The greedy solver does
//! not necessarily find that solution, so each candidate is checked with
//! [`analyze`] and only accepted when it solves.

use std::ops::Range;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::cancel::CancelToken;
use crate::color::Color;
use crate::error::GenerateError;
use crate::puzzle::Puzzle;
use crate::solver::analyze;
use crate::tube::Tube;

/// Tuning knobs for candidate construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Number of reversed pours per candidate, drawn uniformly from this range
    pub scramble_moves: Range<usize>,
    /// Random pairwise tube swaps applied after scrambling
    pub shuffle_swaps: usize,
    /// Reversed pours that found no destination before scrambling gives up early
    pub max_failed_scrambles: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            scramble_moves: 5..40,
            shuffle_swaps: 10,
            max_failed_scrambles: 1000,
        }
    }
}

/// Puzzle generator.
///
/// The random source lives in the generator, so one instance must not be
/// shared between threads without external locking.
#[derive(Debug, Clone)]
pub struct Generator<R = StdRng> {
    config: GeneratorConfig,
    rng: R,
}

impl Default for Generator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<StdRng> {
    /// Create a generator seeded from system entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy(), GeneratorConfig::default())
    }

    /// Create a generator with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), GeneratorConfig::default())
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self::with_rng(StdRng::from_entropy(), config)
    }
}

impl<R: Rng> Generator<R> {
    pub fn with_rng(rng: R, config: GeneratorConfig) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a puzzle that the greedy solver can solve.
    ///
    /// Loops until a candidate is accepted. `Ok(None)` means `cancel` fired;
    /// it is polled after each rejected candidate, so an accepted first
    /// candidate is returned even if the token was cancelled up front.
    pub fn generate(
        &mut self,
        tube_count: usize,
        color_count: usize,
        depth: usize,
        cancel: &CancelToken,
    ) -> Result<Option<Puzzle>, GenerateError> {
        validate_arguments(tube_count, color_count, depth)?;

        let mut attempts: usize = 0;
        loop {
            attempts += 1;

            let candidate = self.build_candidate(tube_count, color_count, depth)?;
            if analyze(&candidate, depth).solved {
                info!(
                    "accepted {}-tube puzzle after {} attempts",
                    tube_count, attempts
                );
                return Ok(Some(candidate));
            }
            debug!("rejected candidate {}: {}", attempts, candidate);

            if cancel.is_cancelled() {
                info!("generation cancelled after {} attempts", attempts);
                return Ok(None);
            }
        }
    }

    /// Sorted state, scrambled, drained and shuffled.
    fn build_candidate(
        &mut self,
        tube_count: usize,
        color_count: usize,
        depth: usize,
    ) -> Result<Puzzle, GenerateError> {
        let mut tubes = sorted_tubes(tube_count, color_count, depth)?;
        self.scramble(&mut tubes, depth)?;
        drain_auxiliary(&mut tubes, color_count, depth)?;
        self.shuffle(&mut tubes);
        Ok(Puzzle::new(tubes))
    }

    /// Apply a random number of reversed pours. Returns how many were applied.
    fn scramble(&mut self, tubes: &mut [Tube], depth: usize) -> Result<usize, GenerateError> {
        let target = if self.config.scramble_moves.is_empty() {
            0
        } else {
            self.rng.gen_range(self.config.scramble_moves.clone())
        };

        let mut applied = 0;
        let mut failures = 0;
        while applied < target {
            let sources: Vec<usize> = tubes
                .iter()
                .enumerate()
                .filter(|(_, t)| t.top_run_len() >= 2)
                .map(|(i, _)| i)
                .collect();
            // Nothing left to split.
            let Some(&source) = sources.choose(&mut self.rng) else {
                break;
            };

            let run = tubes[source].top_run_len();
            let split = self.rng.gen_range(1..run);

            match self.pick_destination(tubes, source, split, depth) {
                Some((destination, len)) => {
                    let color = tubes[source].pop(len)?;
                    tubes[destination].push(color, len);
                    applied += 1;
                }
                None => {
                    failures += 1;
                    if failures >= self.config.max_failed_scrambles {
                        debug!("scramble stopped after {} failed pours", failures);
                        break;
                    }
                }
            }
        }
        Ok(applied)
    }

    /// Find a tube that can take `len` units from `source`, trying `split`
    /// first and shrinking towards 1. Returns the tube and the length that fits.
    fn pick_destination(
        &mut self,
        tubes: &[Tube],
        source: usize,
        split: usize,
        depth: usize,
    ) -> Option<(usize, usize)> {
        let moving = tubes[source].top_color();
        for len in (1..=split).rev() {
            let valid: Vec<usize> = tubes
                .iter()
                .enumerate()
                .filter(|&(i, t)| {
                    i != source && t.top_color() != moving && t.free_space(depth) >= len
                })
                .map(|(i, _)| i)
                .collect();
            if let Some(&destination) = valid.choose(&mut self.rng) {
                return Some((destination, len));
            }
        }
        None
    }

    /// Cosmetic repositioning of tubes.
    fn shuffle(&mut self, tubes: &mut [Tube]) {
        let n = tubes.len();
        if n == 0 {
            return;
        }
        for _ in 0..self.config.shuffle_swaps {
            let a = self.rng.gen_range(0..n);
            let mut b = self.rng.gen_range(0..n);
            if a == b {
                b = (b + 1) % n;
            }
            tubes.swap(a, b);
        }
    }
}

fn validate_arguments(
    tube_count: usize,
    color_count: usize,
    depth: usize,
) -> Result<(), GenerateError> {
    if color_count > tube_count {
        return Err(GenerateError::TooManyColors {
            colors: color_count,
            tubes: tube_count,
        });
    }
    if tube_count == 0 {
        return Err(GenerateError::InvalidArgument(
            "tube count must be positive".to_string(),
        ));
    }
    if color_count == 0 {
        return Err(GenerateError::InvalidArgument(
            "color count must be positive".to_string(),
        ));
    }
    if depth == 0 {
        return Err(GenerateError::InvalidArgument(
            "depth must be positive".to_string(),
        ));
    }
    if color_count > Color::MAX_COLORS {
        return Err(GenerateError::PaletteExhausted { colors: color_count });
    }
    Ok(())
}

/// Tube `i < color_count` is full of color `i`; the rest are empty.
fn sorted_tubes(
    tube_count: usize,
    color_count: usize,
    depth: usize,
) -> Result<Vec<Tube>, GenerateError> {
    (0..tube_count)
        .map(|i| {
            if i < color_count {
                let color = Color::from_index(i).ok_or(GenerateError::PaletteExhausted {
                    colors: color_count,
                })?;
                Ok(Tube::filled(color, depth))
            } else {
                Ok(Tube::new())
            }
        })
        .collect()
}

/// Move every unit left in the auxiliary tubes onto non-full colored tubes,
/// one unit at a time.
fn drain_auxiliary(
    tubes: &mut [Tube],
    color_count: usize,
    depth: usize,
) -> Result<(), GenerateError> {
    for aux in color_count..tubes.len() {
        while !tubes[aux].is_empty() {
            let target = (0..color_count)
                .find(|&j| !tubes[j].is_full(depth))
                .ok_or(GenerateError::DrainStalled { tube: aux })?;
            let color = tubes[aux].pop(1)?;
            tubes[target].push(color, 1);
        }
    }
    Ok(())
}
