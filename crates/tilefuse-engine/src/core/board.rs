use std::{
    fmt::{self, Write as _},
    str,
};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::direction::Direction;

/// Width and height of the square board.
pub const BOARD_SIDE: usize = 4;
/// Number of cells on the board.
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;
/// Largest cell exponent the engine supports.
///
/// The value-function tables are sized for exponents in `0..=MAX_EXPONENT`,
/// so this bound must never be exceeded by game play. The theoretical maximum
/// tile on a 4x4 board is 2^17, leaving comfortable headroom.
pub const MAX_EXPONENT: u8 = 24;

/// State of the 4x4 tile grid.
///
/// Each cell holds a small exponent: 0 means empty, `k >= 1` denotes a tile
/// whose displayed number is `2^k`. Cells are addressed row-major, so cell 0
/// is the top-left corner and cell 15 the bottom-right.
///
/// Boards are plain values. Copying one produces an independent board, which
/// is how the lookahead search creates and discards transient positions.
///
/// # Serialized form
///
/// A board serializes as a 32-character hex string, two characters per cell
/// in row-major order (e.g. an empty board is `"000...0"`). This keeps board
/// snapshots compact inside JSON fixtures and replay records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [u8; CELL_COUNT],
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut hex_string = String::with_capacity(CELL_COUNT * 2);
        for cell in self.cells {
            write!(&mut hex_string, "{cell:02x}").unwrap();
        }
        serializer.serialize_str(&hex_string)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.len() != CELL_COUNT * 2 {
            return Err(serde::de::Error::custom(format!(
                "expected {} hex characters, got {}",
                CELL_COUNT * 2,
                s.len()
            )));
        }

        let mut cells = [0; CELL_COUNT];
        for (i, pair) in s.as_bytes().chunks_exact(2).enumerate() {
            let pair = str::from_utf8(pair).map_err(serde::de::Error::custom)?;
            let exponent = u8::from_str_radix(pair, 16).map_err(|e| {
                serde::de::Error::custom(format!("invalid hex at cell {i}: {pair} ({e})"))
            })?;
            if exponent > MAX_EXPONENT {
                return Err(serde::de::Error::custom(format!(
                    "cell {i} exponent {exponent} exceeds maximum {MAX_EXPONENT}"
                )));
            }
            cells[i] = exponent;
        }

        Ok(Board { cells })
    }
}

impl Board {
    /// The empty board (all cells 0).
    pub const EMPTY: Self = Self {
        cells: [0; CELL_COUNT],
    };

    /// Creates an empty board.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Builds a board from four rows of cell exponents, top row first.
    ///
    /// Intended for tests and fixtures.
    ///
    /// # Panics
    ///
    /// Panics if any exponent exceeds [`MAX_EXPONENT`].
    #[must_use]
    pub fn from_rows(rows: [[u8; BOARD_SIDE]; BOARD_SIDE]) -> Self {
        let mut cells = [0; CELL_COUNT];
        for (y, row) in rows.iter().enumerate() {
            for (x, &exponent) in row.iter().enumerate() {
                assert!(
                    exponent <= MAX_EXPONENT,
                    "cell ({x}, {y}) exponent {exponent} exceeds maximum {MAX_EXPONENT}"
                );
                cells[y * BOARD_SIDE + x] = exponent;
            }
        }
        Self { cells }
    }

    /// Returns the exponent stored at `cell`.
    ///
    /// # Panics
    ///
    /// Panics if `cell >= CELL_COUNT`. Out-of-range access is a caller bug,
    /// not a reportable game outcome.
    #[must_use]
    pub fn get(&self, cell: usize) -> u8 {
        self.cells[cell]
    }

    /// Writes `exponent` into `cell`, overwriting its previous content.
    pub fn place(&mut self, cell: usize, exponent: u8) {
        debug_assert!(exponent <= MAX_EXPONENT);
        self.cells[cell] = exponent;
    }

    /// Returns the indices of all empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> ArrayVec<usize, CELL_COUNT> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &exponent)| exponent == 0)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Returns the largest exponent currently on the board.
    #[must_use]
    pub fn max_exponent(&self) -> u8 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Slides all tiles in `direction`, merging pairs of equal tiles.
    ///
    /// Each line orthogonal to `direction` is compacted toward the target
    /// edge; two adjacent equal exponents combine into a single tile of
    /// exponent + 1, contributing `2^(exponent + 1)` to the returned reward.
    /// A tile produced by a merge never merges again within the same slide.
    ///
    /// Returns `None` when the slide changes no cell, which marks the
    /// direction as illegal for this position. Deterministic: identical input
    /// board and direction always produce identical output and reward.
    pub fn slide(&mut self, direction: Direction) -> Option<u32> {
        let before = *self;
        let mut reward = 0;
        for line in 0..BOARD_SIDE {
            reward += slide_line(&mut self.cells, line_cells(direction, line));
        }
        (*self != before).then_some(reward)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIDE {
            for x in 0..BOARD_SIDE {
                let exponent = self.cells[y * BOARD_SIDE + x];
                if exponent == 0 {
                    write!(f, "{:>7}", ".")?;
                } else {
                    write!(f, "{:>7}", 1u32 << exponent)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Cell indices of one line, ordered from the edge tiles slide toward.
fn line_cells(direction: Direction, line: usize) -> [usize; BOARD_SIDE] {
    match direction {
        Direction::Up => [line, line + 4, line + 8, line + 12],
        Direction::Down => [line + 12, line + 8, line + 4, line],
        Direction::Left => [4 * line, 4 * line + 1, 4 * line + 2, 4 * line + 3],
        Direction::Right => [4 * line + 3, 4 * line + 2, 4 * line + 1, 4 * line],
    }
}

/// Compacts and merges one line in place, returning the reward earned.
///
/// Single forward scan with a held tile: a tile equal to the held one merges
/// with it, anything else flushes the held tile and takes its place. This
/// makes the no-re-merge rule structural rather than checked.
fn slide_line(cells: &mut [u8; CELL_COUNT], line: [usize; BOARD_SIDE]) -> u32 {
    let mut merged = [0; BOARD_SIDE];
    let mut top = 0;
    let mut hold = 0;
    let mut reward = 0;

    for &cell in &line {
        let tile = cells[cell];
        if tile == 0 {
            continue;
        }
        if hold == 0 {
            hold = tile;
        } else if tile == hold {
            merged[top] = hold + 1;
            reward += 1u32 << (hold + 1);
            top += 1;
            hold = 0;
        } else {
            merged[top] = hold;
            top += 1;
            hold = tile;
        }
    }
    if hold != 0 {
        merged[top] = hold;
    }

    for (slot, &cell) in line.iter().enumerate() {
        cells[cell] = merged[slot];
    }
    reward
}
