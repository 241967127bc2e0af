use std::iter;

use tilefuse_engine::Board;

use crate::{
    pattern::{TuplePattern, default_patterns},
    table::WeightTable,
};

/// The n-tuple value function: fixed tuple patterns, one weight table each.
///
/// A board's value estimate is the sum over all pattern/table pairs of the
/// weight selected by the pattern's feature index in that board. The pattern
/// set is fixed at construction; learning only changes table contents.
#[derive(Debug, Clone)]
pub struct NTupleNetwork {
    patterns: Vec<TuplePattern>,
    tables: Vec<WeightTable>,
}

impl NTupleNetwork {
    /// Creates a network with zeroed tables sized for `patterns`.
    #[must_use]
    pub fn with_patterns(patterns: Vec<TuplePattern>) -> Self {
        let tables = patterns
            .iter()
            .map(|pattern| WeightTable::zeroed(pattern.table_len()))
            .collect();
        Self { patterns, tables }
    }

    /// Creates a network over the reference pattern set.
    ///
    /// Allocates the full reference table set, which is large; see
    /// [`default_patterns`].
    #[must_use]
    pub fn with_default_patterns() -> Self {
        Self::with_patterns(default_patterns())
    }

    /// Returns the tuple patterns in network order.
    #[must_use]
    pub fn patterns(&self) -> &[TuplePattern] {
        &self.patterns
    }

    /// Returns the weight tables in network order.
    #[must_use]
    pub fn tables(&self) -> &[WeightTable] {
        &self.tables
    }

    /// Returns the weight tables mutably, preserving network order.
    pub fn tables_mut(&mut self) -> &mut [WeightTable] {
        &mut self.tables
    }

    /// Estimates the value of `board` as the sum of all table lookups.
    #[must_use]
    pub fn estimate(&self, board: &Board) -> f32 {
        iter::zip(&self.patterns, &self.tables)
            .map(|(pattern, table)| table.get(pattern.feature_index(board)))
            .sum()
    }

    /// Moves the estimate for `board` toward `target`.
    ///
    /// Computes `error = target - estimate(board)` and adds
    /// `learning_rate * error` to every pattern's selected weight. Each table
    /// receives the same scalar correction: gradient descent on a model that
    /// is linear in its one-hot tuple features. Returns the error before the
    /// update.
    pub fn adjust(&mut self, board: &Board, target: f32, learning_rate: f32) -> f32 {
        let error = target - self.estimate(board);
        let adjustment = learning_rate * error;
        for (pattern, table) in iter::zip(&self.patterns, &mut self.tables) {
            table.accumulate(pattern.feature_index(board), adjustment);
        }
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_network() -> NTupleNetwork {
        NTupleNetwork::with_patterns(vec![
            TuplePattern::new(&[0, 1]),
            TuplePattern::new(&[4, 5]),
            TuplePattern::new(&[0, 4]),
        ])
    }

    fn sample_board() -> Board {
        Board::from_rows([[1, 2, 0, 0], [3, 0, 0, 0], [0; 4], [0; 4]])
    }

    #[test]
    fn test_zeroed_network_estimates_zero() {
        let network = small_network();
        assert_eq!(network.estimate(&sample_board()), 0.0);
    }

    #[test]
    fn test_estimate_is_sum_over_tables() {
        let mut network = small_network();
        let board = sample_board();
        let indices: Vec<usize> = network
            .patterns()
            .iter()
            .map(|pattern| pattern.feature_index(&board))
            .collect();
        for (table, &index) in network.tables_mut().iter_mut().zip(&indices) {
            table.as_mut_slice()[index] = 1.5;
        }
        assert!((network.estimate(&board) - 4.5).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_order_invariance() {
        // Summation over pattern/table pairs must not depend on pair order.
        let board = sample_board();
        let mut forward = small_network();
        let mut reversed = NTupleNetwork::with_patterns(vec![
            TuplePattern::new(&[0, 4]),
            TuplePattern::new(&[4, 5]),
            TuplePattern::new(&[0, 1]),
        ]);
        forward.adjust(&board, 6.0, 0.25);
        reversed.adjust(&board, 6.0, 0.25);
        assert!((forward.estimate(&board) - reversed.estimate(&board)).abs() < 1e-5);
    }

    #[test]
    fn test_adjust_moves_estimate_toward_target() {
        let mut network = small_network();
        let board = sample_board();
        let target = 10.0;

        let before = (target - network.estimate(&board)).abs();
        let error = network.adjust(&board, target, 0.05);
        assert!((error - 10.0).abs() < 1e-6);

        let after = (target - network.estimate(&board)).abs();
        assert!(after < before);
        // 3 patterns each moved by 0.05 * 10: estimate becomes 1.5.
        assert!((network.estimate(&board) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_adjust_with_zero_rate_is_noop() {
        let mut network = small_network();
        let board = sample_board();
        let snapshot = network.clone();
        network.adjust(&board, 42.0, 0.0);
        for (table, original) in iter::zip(network.tables(), snapshot.tables()) {
            assert_eq!(table.as_slice(), original.as_slice());
        }
    }

    #[test]
    fn test_adjust_only_touches_selected_weights() {
        let mut network = small_network();
        let board = sample_board();
        network.adjust(&board, 8.0, 0.5);
        for (pattern, table) in iter::zip(network.patterns(), network.tables()) {
            let index = pattern.feature_index(&board);
            for (i, &weight) in table.as_slice().iter().enumerate() {
                if i == index {
                    assert!((weight - 4.0).abs() < 1e-6);
                } else {
                    assert_eq!(weight, 0.0);
                }
            }
        }
    }
}
