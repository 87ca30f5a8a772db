//! End-to-end checks of the solver and generator through the public API.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use watersort::{
    analyze, collect_moves, verify_steps, CancelToken, Color, FailedReason, GenerateError,
    Generator, Puzzle, Step, Tube,
};

fn puzzle(tubes: &[&[u8]]) -> Puzzle {
    Puzzle::new(
        tubes
            .iter()
            .map(|ids| Tube::from_colors(ids.iter().copied().map(Color::new)))
            .collect(),
    )
}

/// Arbitrary (not necessarily solvable) puzzles with no tube above `depth`.
fn random_puzzles(seed: u64, count: usize) -> Vec<(Puzzle, usize)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let depth = rng.gen_range(1..=4);
            let colors = rng.gen_range(1..=3u8);
            let tubes = (0..rng.gen_range(2..=5))
                .map(|_| {
                    let len = rng.gen_range(0..=depth);
                    Tube::from_colors((0..len).map(|_| Color::new(rng.gen_range(0..colors))))
                })
                .collect();
            (Puzzle::new(tubes), depth)
        })
        .collect()
}

mod solver {
    use super::*;

    #[test]
    fn single_full_tube_and_empty_tube_is_already_solved() {
        let result = analyze(&puzzle(&[&[0], &[]]), 1);
        assert!(result.solved);
        assert!(result.steps().is_empty());
    }

    #[test]
    fn greedy_split_leaves_puzzle_stuck() {
        let p = puzzle(&[&[0, 1], &[]]);
        assert_eq!(collect_moves(&p, 2), vec![Step::new(0, 1)]);

        let mut after = p.clone();
        after.apply(Step::new(0, 1)).unwrap();
        assert_eq!(after, puzzle(&[&[0], &[1]]));
        assert!(collect_moves(&after, 2).is_empty());

        let result = analyze(&p, 2);
        assert!(!result.solved);
        assert_eq!(result.failed_reason, FailedReason::PuzzleInvalid);
    }

    #[test]
    fn analyze_never_mutates_its_input() {
        for (p, depth) in random_puzzles(5, 300) {
            let before = p.clone();
            let result = analyze(&p, depth);
            assert_eq!(p, before);
            assert_eq!(result.puzzle, before);
        }
    }

    #[test]
    fn solved_steps_replay_to_terminal_state() {
        let mut solved = 0;
        for (p, depth) in random_puzzles(17, 300) {
            let result = analyze(&p, depth);
            if result.solved {
                solved += 1;
                assert_eq!(verify_steps(&p, result.steps(), depth), Ok(true));
            } else {
                assert!(result.steps.is_none());
            }
            assert_ne!(result.failed_reason, FailedReason::UnhandledException);
        }
        assert!(solved > 0);
    }

    #[test]
    fn collected_moves_respect_pour_rules() {
        for (p, depth) in random_puzzles(23, 300) {
            for step in collect_moves(&p, depth) {
                let from = &p[step.from];
                let to = &p[step.to];
                assert_ne!(step.from, step.to);
                assert!(!from.is_empty());
                assert!(to.free_space(depth) >= from.top_run_len());
                assert!(!(from.is_monocolored() && to.is_empty()));
                assert!(to.top_color().map_or(true, |c| Some(c) == from.top_color()));
            }
        }
    }
}

mod generator {
    use super::*;

    #[test]
    fn rejects_fewer_tubes_than_colors() {
        let result = Generator::with_seed(0).generate(2, 3, 4, &CancelToken::new());
        assert_eq!(result, Err(GenerateError::TooManyColors { colors: 3, tubes: 2 }));
    }

    #[test]
    fn accepted_puzzles_have_requested_shape_and_solve() {
        let token = CancelToken::with_timeout(Duration::from_secs(60));
        let shapes = [(4, 2, 4), (5, 3, 4), (5, 3, 3), (3, 2, 2), (6, 4, 4)];
        for (seed, (tubes, colors, depth)) in shapes.into_iter().enumerate() {
            let mut generator = Generator::with_seed(seed as u64);
            let p = generator
                .generate(tubes, colors, depth, &token)
                .unwrap()
                .expect("generation timed out");

            assert_eq!(p.len(), tubes);
            assert_eq!(p.colors().len(), colors);
            assert!(p.iter().all(|t| t.len() <= depth));

            let result = analyze(&p, depth);
            assert!(result.solved);
            assert_eq!(verify_steps(&p, result.steps(), depth), Ok(true));
        }
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let token = CancelToken::with_timeout(Duration::from_secs(60));
        let first = Generator::with_seed(2024).generate(7, 5, 4, &token).unwrap();
        let second = Generator::with_seed(2024).generate(7, 5, 4, &token).unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn stats_describe_generated_puzzle() {
        let token = CancelToken::with_timeout(Duration::from_secs(60));
        let p = Generator::with_seed(8)
            .generate(6, 4, 4, &token)
            .unwrap()
            .expect("generation timed out");
        let stats = p.stats();
        assert_eq!(stats.tubes, 6);
        assert_eq!(stats.colors, 4);
        assert_eq!(stats.color_count_histogram.values().sum::<usize>(), 6);
        assert_eq!(
            stats.color_count_histogram.get(&0).copied().unwrap_or(0),
            stats.empty_tubes
        );
    }
}
