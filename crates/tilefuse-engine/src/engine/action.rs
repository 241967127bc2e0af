use crate::core::{Board, Direction};

/// A move produced by one agent and consumed by the episode driver.
///
/// Player-role agents emit [`Action::Slide`]; environment-role agents emit
/// [`Action::Place`]. "No legal action" is expressed as `Option<Action>` at
/// the agent boundary rather than a dedicated null variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Action {
    /// Slide all tiles in the given direction.
    Slide(Direction),
    /// Spawn a tile with the given exponent on an empty cell.
    Place { cell: usize, exponent: u8 },
}

impl Action {
    /// Applies this action to `board`, returning the reward it earned.
    ///
    /// A slide returns the merge reward from [`Board::slide`]; a placement
    /// returns 0. Returns `None` when the action is illegal for this board
    /// (no cell changed by the slide, or the target cell is occupied).
    pub fn apply(self, board: &mut Board) -> Option<u32> {
        match self {
            Action::Slide(direction) => board.slide(direction),
            Action::Place { cell, exponent } => {
                if board.get(cell) != 0 {
                    return None;
                }
                board.place(cell, exponent);
                Some(0)
            }
        }
    }
}
