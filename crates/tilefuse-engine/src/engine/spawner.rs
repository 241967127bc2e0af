use arrayvec::ArrayVec;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg64Mcg;

use crate::{
    core::{Board, CELL_COUNT},
    engine::action::Action,
};

/// Exponent of a spawned 2-tile.
pub const TWO_TILE_EXPONENT: u8 = 1;
/// Exponent of a spawned 4-tile.
pub const FOUR_TILE_EXPONENT: u8 = 2;
/// Probability that a spawned tile is a 2-tile.
pub const TWO_TILE_PROBABILITY: f32 = 0.9;
/// Probability that a spawned tile is a 4-tile.
pub const FOUR_TILE_PROBABILITY: f32 = 0.1;

// Sampling draws one value in 0..FOUR_TILE_ODDS and spawns a 4-tile on zero.
const FOUR_TILE_ODDS: u32 = 10;

/// Samples random tile spawns for the environment role.
///
/// Picks a uniformly random empty cell and, independently, a 2-tile with
/// probability 0.9 or a 4-tile with probability 0.1.
#[derive(Debug, Clone)]
pub struct TileSpawner {
    rng: Pcg64Mcg,
}

impl TileSpawner {
    /// Creates a spawner seeded from the OS random source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Pcg64Mcg::from_os_rng(),
        }
    }

    /// Creates a spawner with a fixed seed for reproducible episodes.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Draws one spawn for `board`.
    ///
    /// Returns `None` when the board has no empty cell, which ends the
    /// episode for the environment role.
    pub fn spawn_action(&mut self, board: &Board) -> Option<Action> {
        let empty = board.empty_cells();
        if empty.is_empty() {
            return None;
        }
        let cell = empty[self.rng.random_range(0..empty.len())];
        let exponent = if self.rng.random_range(0..FOUR_TILE_ODDS) == 0 {
            FOUR_TILE_EXPONENT
        } else {
            TWO_TILE_EXPONENT
        };
        Some(Action::Place { cell, exponent })
    }
}

impl Default for TileSpawner {
    fn default() -> Self {
        Self::new()
    }
}

/// One outcome of the spawn distribution for a particular board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOutcome {
    pub cell: usize,
    pub exponent: u8,
    pub probability: f32,
}

/// Enumerates the full spawn distribution for `board` analytically.
///
/// Yields a `(cell, exponent, probability)` triple for every empty cell and
/// both tile exponents; probabilities sum to 1 whenever the board has at
/// least one empty cell. This is the expectimax-facing view of the spawn
/// model, used instead of sampling when an agent needs the expectation over
/// the next placed tile.
#[must_use]
pub fn spawn_outcomes(board: &Board) -> ArrayVec<SpawnOutcome, { 2 * CELL_COUNT }> {
    let empty = board.empty_cells();
    let mut outcomes = ArrayVec::new();
    #[expect(clippy::cast_precision_loss)]
    let n_empty = empty.len() as f32;
    for &cell in &empty {
        outcomes.push(SpawnOutcome {
            cell,
            exponent: TWO_TILE_EXPONENT,
            probability: TWO_TILE_PROBABILITY / n_empty,
        });
        outcomes.push(SpawnOutcome {
            cell,
            exponent: FOUR_TILE_EXPONENT,
            probability: FOUR_TILE_PROBABILITY / n_empty,
        });
    }
    outcomes
}

#[cfg(test)]
mod tests {
    use crate::core::Direction;

    use super::*;

    #[test]
    fn test_spawn_targets_an_empty_cell() {
        let mut spawner = TileSpawner::with_seed(1);
        let mut board = Board::from_rows([
            [1, 2, 1, 2],
            [2, 1, 2, 1],
            [1, 2, 0, 2],
            [2, 1, 2, 1],
        ]);
        let action = spawner.spawn_action(&board).unwrap();
        let Action::Place { cell, exponent } = action else {
            panic!("expected a placement, got {action:?}");
        };
        assert_eq!(cell, 10);
        assert!(exponent == TWO_TILE_EXPONENT || exponent == FOUR_TILE_EXPONENT);
        assert_eq!(action.apply(&mut board), Some(0));
    }

    #[test]
    fn test_full_board_yields_no_spawn() {
        let mut spawner = TileSpawner::with_seed(1);
        let board = Board::from_rows([[1; 4], [2; 4], [1; 4], [2; 4]]);
        assert_eq!(spawner.spawn_action(&board), None);
    }

    #[test]
    fn test_same_seed_replays_same_spawns() {
        let board = Board::new();
        let mut a = TileSpawner::with_seed(42);
        let mut b = TileSpawner::with_seed(42);
        for _ in 0..50 {
            assert_eq!(a.spawn_action(&board), b.spawn_action(&board));
        }
    }

    #[test]
    fn test_spawn_frequencies_match_distribution() {
        let mut spawner = TileSpawner::with_seed(9);
        let board = Board::new();
        let mut four_tiles = 0;
        let total = 10_000;
        for _ in 0..total {
            let Some(Action::Place { exponent, .. }) = spawner.spawn_action(&board) else {
                panic!("empty board must always spawn");
            };
            if exponent == FOUR_TILE_EXPONENT {
                four_tiles += 1;
            }
        }
        // 10% expected; allow a generous band for the fixed seed.
        assert!((800..1200).contains(&four_tiles), "got {four_tiles}");
    }

    #[test]
    fn test_outcome_enumeration_covers_distribution() {
        let mut board = Board::from_rows([[1, 1, 0, 0], [0; 4], [0; 4], [0; 4]]);
        board.slide(Direction::Left).unwrap();

        let outcomes = spawn_outcomes(&board);
        assert_eq!(outcomes.len(), 2 * board.empty_cells().len());

        let total: f32 = outcomes.iter().map(|o| o.probability).sum();
        assert!((total - 1.0).abs() < 1e-5);

        for outcome in &outcomes {
            assert_eq!(board.get(outcome.cell), 0);
            let expected = match outcome.exponent {
                TWO_TILE_EXPONENT => TWO_TILE_PROBABILITY,
                FOUR_TILE_EXPONENT => FOUR_TILE_PROBABILITY,
                other => panic!("unexpected exponent {other}"),
            };
            #[expect(clippy::cast_precision_loss)]
            let n_empty = board.empty_cells().len() as f32;
            assert!((outcome.probability - expected / n_empty).abs() < 1e-6);
        }
    }

    #[test]
    fn test_full_board_has_no_outcomes() {
        let board = Board::from_rows([[1; 4], [2; 4], [1; 4], [2; 4]]);
        assert!(spawn_outcomes(&board).is_empty());
    }
}
