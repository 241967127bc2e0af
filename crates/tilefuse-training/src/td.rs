use rand::{Rng as _, SeedableRng as _};
use rand_distr::Normal;
use rand_pcg::Pcg64Mcg;

use tilefuse_engine::{Action, Board, Direction, spawn_outcomes};
use tilefuse_network::{NTupleNetwork, WeightFileError, persist};

use crate::{
    agent::{Agent, Role},
    config::{AgentConfig, ConfigError, InitScheme},
};

/// One recorded decision: the reward earned and the afterstate reached.
#[derive(Debug, Clone, Copy)]
struct EpisodeStep {
    reward: u32,
    after: Board,
}

/// The learning player.
///
/// Selects slides by a one-ply expectimax over the analytic spawn
/// distribution and trains the value network with backward n-step TD(0)
/// updates replayed over the finished episode.
///
/// Only afterstates are valued: the network never sees a board with a
/// freshly spawned tile except through the lookahead expectation.
#[derive(Debug)]
pub struct TdPlayer {
    config: AgentConfig,
    network: NTupleNetwork,
    history: Vec<EpisodeStep>,
}

impl TdPlayer {
    /// Builds a player over the reference pattern set.
    ///
    /// Applies the configured initialization scheme, then restores weights
    /// from the configured load path if one is set. A load failure is a
    /// fatal configuration error for the caller; there is no partial-load
    /// fallback.
    pub fn from_config(config: AgentConfig) -> Result<Self, WeightFileError> {
        let network = NTupleNetwork::with_default_patterns();
        Self::with_network(config, network)
    }

    /// Builds a player over a caller-supplied network.
    ///
    /// The initialization scheme and load path from `config` are applied to
    /// the given network exactly as in [`TdPlayer::from_config`].
    pub fn with_network(
        config: AgentConfig,
        mut network: NTupleNetwork,
    ) -> Result<Self, WeightFileError> {
        apply_init(&mut network, config.init, config.seed);
        if let Some(path) = &config.load {
            persist::load(&mut network, path)?;
        }
        Ok(Self {
            config,
            network,
            history: Vec::new(),
        })
    }

    /// Returns the value network.
    #[must_use]
    pub fn network(&self) -> &NTupleNetwork {
        &self.network
    }

    /// Writes the network to the configured save path, if any.
    ///
    /// Returns `true` when a file was written.
    pub fn save_weights(&self) -> Result<bool, WeightFileError> {
        match &self.config.save {
            Some(path) => {
                persist::save(&self.network, path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Expected value of `after` over the next spawned tile.
    ///
    /// For every spawn outcome the player's best response is searched over
    /// all four directions, ranked by `reward + estimate`; the accumulated
    /// term is the estimate component of that best response, weighted by the
    /// outcome probability. A spawn that leaves no legal response contributes
    /// `f32::MIN`, which poisons the branch so the current ply avoids it.
    ///
    /// This extra ply only ranks the current decision. Neither its rewards
    /// nor its boards enter the episode history.
    #[expect(clippy::cast_precision_loss)]
    fn expected_value(&self, after: &Board) -> f32 {
        let mut value = 0.0;
        for outcome in spawn_outcomes(after) {
            let mut spawned = *after;
            spawned.place(outcome.cell, outcome.exponent);

            let mut best_sum = f32::MIN;
            let mut best_estimate = f32::MIN;
            for direction in Direction::ALL {
                let mut response = spawned;
                let Some(reward) = response.slide(direction) else {
                    continue;
                };
                let estimate = self.network.estimate(&response);
                let sum = reward as f32 + estimate;
                if sum > best_sum {
                    best_sum = sum;
                    best_estimate = estimate;
                }
            }
            value += outcome.probability * best_estimate;
        }
        value
    }
}

/// Fills the network according to the configured initialization scheme.
fn apply_init(network: &mut NTupleNetwork, init: InitScheme, seed: Option<u64>) {
    let InitScheme::Normal { sigma } = init else {
        return;
    };
    let mut rng = match seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_os_rng(),
    };
    // Sigma is validated at parse time, so the distribution is well formed.
    let normal = Normal::new(0.0, sigma).unwrap();
    for table in network.tables_mut() {
        for weight in table.as_mut_slice() {
            *weight = rng.sample(normal);
        }
    }
}

impl Agent for TdPlayer {
    fn open_episode(&mut self, _flag: &str) {
        self.history.clear();
    }

    /// Replays the episode backward, updating the network.
    ///
    /// The terminal afterstate is adjusted toward 0. Every earlier step is
    /// adjusted toward the sum of the next `n` recorded rewards plus, when
    /// the window stays inside the history, the current estimate of the
    /// afterstate `n` steps ahead. Because the walk runs most-recent-first,
    /// those bootstrap estimates read weights already updated earlier in the
    /// same pass. That ordering is part of the learning rule; do not reorder
    /// or parallelize this loop.
    #[expect(clippy::cast_precision_loss)]
    fn close_episode(&mut self, _flag: &str) {
        if self.history.is_empty() || self.config.alpha == 0.0 {
            return;
        }
        let alpha = self.config.alpha;
        let n_step = self.config.n_step;

        let last = self.history.len() - 1;
        let terminal = self.history[last].after;
        self.network.adjust(&terminal, 0.0, alpha);

        for i in (0..last).rev() {
            let mut total_reward: u32 = 0;
            for j in 1..=n_step {
                if i + j >= self.history.len() {
                    break;
                }
                total_reward += self.history[i + j].reward;
            }

            let target = if i + n_step >= self.history.len() {
                total_reward as f32
            } else {
                total_reward as f32 + self.network.estimate(&self.history[i + n_step].after)
            };
            let state = self.history[i].after;
            self.network.adjust(&state, target, alpha);
        }
    }

    /// Picks the legal slide maximizing `reward + expected_value(after)`.
    ///
    /// Ties are broken toward the first direction in the fixed enumeration
    /// order because only a strictly better sum replaces the incumbent. The
    /// chosen reward and afterstate are appended to the episode history;
    /// when no direction qualifies, nothing is recorded and no action is
    /// returned.
    #[expect(clippy::cast_precision_loss)]
    fn take_action(&mut self, before: &Board) -> Option<Action> {
        let mut best: Option<(Direction, u32, Board)> = None;
        let mut best_sum = f32::MIN;

        for direction in Direction::ALL {
            let mut after = *before;
            let Some(reward) = after.slide(direction) else {
                continue;
            };
            let sum = reward as f32 + self.expected_value(&after);
            if sum > best_sum {
                best_sum = sum;
                best = Some((direction, reward, after));
            }
        }

        let (direction, reward, after) = best?;
        self.history.push(EpisodeStep { reward, after });
        Some(Action::Slide(direction))
    }

    fn notify(&mut self, message: &str) -> Result<(), ConfigError> {
        self.config.apply_token(message)
    }

    fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or("td")
    }

    fn role(&self) -> Role {
        Role::Player
    }
}
