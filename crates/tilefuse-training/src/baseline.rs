use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg64Mcg;

use tilefuse_engine::{Action, Board, Direction};

use crate::{
    agent::{Agent, Role},
    config::{AgentConfig, ConfigError},
};

/// Decision policy of a non-learning baseline player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::FromStr)]
pub enum PlayStyle {
    /// A uniformly random legal slide.
    #[default]
    Random,
    /// The slide with the highest immediate reward.
    Greedy,
    /// The first slide of the best two-slide reward sum. The second ply
    /// ignores the tile spawned in between; the depth is fixed by design.
    Greedy2,
}

/// A non-learning player used as a reference opponent for the TD player.
#[derive(Debug)]
pub struct BaselinePlayer {
    config: AgentConfig,
    style: PlayStyle,
    rng: Pcg64Mcg,
}

impl BaselinePlayer {
    /// Creates a baseline player with the given decision policy.
    #[must_use]
    pub fn from_config(config: AgentConfig, style: PlayStyle) -> Self {
        let rng = match config.seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed),
            None => Pcg64Mcg::from_os_rng(),
        };
        Self { config, style, rng }
    }

    fn random_action(&mut self, board: &Board) -> Option<Action> {
        let mut directions = Direction::ALL;
        directions.shuffle(&mut self.rng);
        for direction in directions {
            let mut after = *board;
            if after.slide(direction).is_some() {
                return Some(Action::Slide(direction));
            }
        }
        None
    }

    fn greedy_action(board: &Board) -> Option<Action> {
        let mut best: Option<(Direction, u32)> = None;
        for direction in Direction::ALL {
            let mut after = *board;
            let Some(reward) = after.slide(direction) else {
                continue;
            };
            if best.is_none_or(|(_, best_reward)| reward > best_reward) {
                best = Some((direction, reward));
            }
        }
        best.map(|(direction, _)| Action::Slide(direction))
    }

    fn greedy2_action(board: &Board) -> Option<Action> {
        let mut best: Option<(Direction, u32)> = None;
        for first in Direction::ALL {
            let mut middle = *board;
            let Some(first_reward) = middle.slide(first) else {
                continue;
            };
            for second in Direction::ALL {
                let mut last = middle;
                let Some(second_reward) = last.slide(second) else {
                    continue;
                };
                let total = first_reward + second_reward;
                if best.is_none_or(|(_, best_total)| total > best_total) {
                    best = Some((first, total));
                }
            }
        }
        best.map(|(direction, _)| Action::Slide(direction))
    }
}

impl Agent for BaselinePlayer {
    fn take_action(&mut self, board: &Board) -> Option<Action> {
        match self.style {
            PlayStyle::Random => self.random_action(board),
            PlayStyle::Greedy => Self::greedy_action(board),
            PlayStyle::Greedy2 => Self::greedy2_action(board),
        }
    }

    fn notify(&mut self, message: &str) -> Result<(), ConfigError> {
        self.config.apply_token(message)
    }

    fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or("baseline")
    }

    fn role(&self) -> Role {
        Role::Player
    }
}
