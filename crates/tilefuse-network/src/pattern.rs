use arrayvec::ArrayVec;

use tilefuse_engine::{Board, CELL_COUNT, MAX_EXPONENT};

/// Number of distinct exponent values a weight table distinguishes (base V).
///
/// Every cell exponent lies in `0..EXPONENT_CARDINALITY`, so a k-cell pattern
/// addresses a table of `EXPONENT_CARDINALITY^k` weights. This is a sizing
/// constant of the value function, not a rule of the game.
pub const EXPONENT_CARDINALITY: usize = MAX_EXPONENT as usize + 1;

/// Maximum number of cells a single pattern may reference.
pub const MAX_PATTERN_CELLS: usize = 6;

/// An ordered subset of board cells used as one feature of the network.
///
/// The pattern's cell order is significant: the first cell is the most
/// significant digit of the feature index. Patterns are fixed at network
/// construction and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuplePattern {
    cells: ArrayVec<usize, MAX_PATTERN_CELLS>,
}

impl TuplePattern {
    /// Creates a pattern over the given cells.
    ///
    /// # Panics
    ///
    /// Panics if `cells` is empty, longer than [`MAX_PATTERN_CELLS`], or
    /// references a cell outside the board. Pattern sets are static data, so
    /// a bad one is a programming error.
    #[must_use]
    pub fn new(cells: &[usize]) -> Self {
        assert!(
            !cells.is_empty() && cells.len() <= MAX_PATTERN_CELLS,
            "pattern must cover 1..={MAX_PATTERN_CELLS} cells, got {}",
            cells.len()
        );
        for &cell in cells {
            assert!(cell < CELL_COUNT, "pattern cell {cell} is out of range");
        }
        Self {
            cells: cells.iter().copied().collect(),
        }
    }

    /// Returns the cells this pattern reads, in digit order.
    #[must_use]
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Returns the number of cells in the pattern.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the weight-table length this pattern requires.
    #[must_use]
    pub fn table_len(&self) -> usize {
        let digits = u32::try_from(self.cells.len()).expect("pattern length fits in u32");
        EXPONENT_CARDINALITY.pow(digits)
    }

    /// Hashes the pattern's cell exponents into a feature index.
    ///
    /// The exponents are read in pattern order and treated as digits of a
    /// base-[`EXPONENT_CARDINALITY`] number, first cell most significant.
    /// Injective over the digit range: boards differing in any pattern cell
    /// map to different indices.
    #[must_use]
    pub fn feature_index(&self, board: &Board) -> usize {
        self.cells.iter().fold(0, |index, &cell| {
            let exponent = usize::from(board.get(cell));
            debug_assert!(exponent < EXPONENT_CARDINALITY);
            index * EXPONENT_CARDINALITY + exponent
        })
    }

    /// Recovers the cell exponents encoded in `index`, in pattern order.
    ///
    /// Inverse of [`Self::feature_index`].
    #[must_use]
    pub fn digits_from_index(&self, mut index: usize) -> ArrayVec<u8, MAX_PATTERN_CELLS> {
        let mut digits: ArrayVec<u8, MAX_PATTERN_CELLS> =
            self.cells.iter().map(|_| 0).collect();
        for digit in digits.iter_mut().rev() {
            *digit = u8::try_from(index % EXPONENT_CARDINALITY).expect("digit fits in u8");
            index /= EXPONENT_CARDINALITY;
        }
        digits
    }
}

// The hand-designed reference feature set: 24 five-cell shapes covering the
// rotations and reflections of three base snakes, plus the 8 straight lines.
// Table order is load-bearing for weight-file compatibility.
const FIVE_CELL_PATTERNS: [[usize; 5]; 24] = [
    [0, 1, 2, 3, 4],
    [5, 6, 7, 10, 11],
    [8, 9, 12, 13, 14],
    [0, 1, 2, 3, 7],
    [4, 5, 6, 8, 9],
    [10, 11, 13, 14, 15],
    [1, 2, 3, 6, 7],
    [4, 5, 8, 9, 10],
    [11, 12, 13, 14, 15],
    [0, 1, 2, 4, 5],
    [6, 7, 9, 10, 11],
    [8, 12, 13, 14, 15],
    [0, 4, 8, 12, 13],
    [1, 2, 5, 6, 9],
    [7, 10, 11, 14, 15],
    [0, 1, 4, 8, 12],
    [5, 9, 10, 13, 14],
    [2, 3, 6, 7, 11],
    [2, 3, 7, 11, 15],
    [6, 9, 10, 13, 14],
    [0, 1, 4, 5, 8],
    [3, 7, 11, 14, 15],
    [1, 2, 5, 6, 10],
    [4, 8, 9, 12, 13],
];

const FOUR_CELL_PATTERNS: [[usize; 4]; 8] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [8, 9, 10, 11],
    [12, 13, 14, 15],
    [0, 4, 8, 12],
    [1, 5, 9, 13],
    [2, 6, 10, 14],
    [3, 7, 11, 15],
];

/// Builds the reference pattern set: 24 five-cell tuples followed by the 8
/// row/column four-cell tuples.
///
/// Note the full table set behind these patterns is large (hundreds of
/// millions of weights); construct it once per process, not per search.
#[must_use]
pub fn default_patterns() -> Vec<TuplePattern> {
    FIVE_CELL_PATTERNS
        .iter()
        .map(|cells| TuplePattern::new(cells))
        .chain(FOUR_CELL_PATTERNS.iter().map(|cells| TuplePattern::new(cells)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_index_digit_order() {
        let pattern = TuplePattern::new(&[0, 1, 2]);
        let board = Board::from_rows([[3, 1, 2, 0], [0; 4], [0; 4], [0; 4]]);
        let expected = (3 * EXPONENT_CARDINALITY + 1) * EXPONENT_CARDINALITY + 2;
        assert_eq!(pattern.feature_index(&board), expected);
    }

    #[test]
    fn test_feature_index_roundtrips_digits() {
        let pattern = TuplePattern::new(&[4, 9, 14]);
        for digits in [[0, 0, 0], [1, 2, 3], [24, 0, 24], [7, 7, 7]] {
            let mut board = Board::new();
            for (&cell, &digit) in pattern.cells().iter().zip(&digits) {
                board.place(cell, digit);
            }
            let index = pattern.feature_index(&board);
            assert!(index < pattern.table_len());
            assert_eq!(pattern.digits_from_index(index).as_slice(), &digits);
        }
    }

    #[test]
    fn test_feature_index_is_injective() {
        // Exhaustive over a two-cell pattern: every digit pair maps to a
        // distinct index.
        let pattern = TuplePattern::new(&[0, 15]);
        let mut seen = vec![false; pattern.table_len()];
        for a in 0..=MAX_EXPONENT {
            for b in 0..=MAX_EXPONENT {
                let mut board = Board::new();
                board.place(0, a);
                board.place(15, b);
                let index = pattern.feature_index(&board);
                assert!(!seen[index], "index {index} produced twice");
                seen[index] = true;
            }
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn test_default_pattern_set_shape() {
        let patterns = default_patterns();
        assert_eq!(patterns.len(), 32);
        assert!(patterns[..24].iter().all(|p| p.cell_count() == 5));
        assert!(patterns[24..].iter().all(|p| p.cell_count() == 4));
        for pattern in &patterns {
            assert!(pattern.cells().iter().all(|&cell| cell < CELL_COUNT));
        }
        // The four-cell tail is exactly the rows then the columns.
        assert_eq!(patterns[24].cells(), &[0, 1, 2, 3]);
        assert_eq!(patterns[28].cells(), &[0, 4, 8, 12]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_cell_is_rejected() {
        let _ = TuplePattern::new(&[0, 16]);
    }
}
