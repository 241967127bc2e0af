use tilefuse_engine::{Action, Board};

use crate::config::ConfigError;

/// The role an agent plays in an episode.
///
/// The role set is closed: a player slides tiles, an environment spawns
/// them. The episode driver alternates between one agent of each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Role {
    #[display("player")]
    Player,
    #[display("environment")]
    Environment,
}

/// Capability interface shared by all agents.
///
/// The episode driver only ever talks to agents through this trait: it opens
/// an episode, repeatedly asks the agent whose turn it is for an action, and
/// closes the episode. `None` from [`Agent::take_action`] means the agent has
/// no legal action, which is a first-class outcome (usually the end of the
/// episode), not an error.
pub trait Agent {
    /// Called once when a new episode begins.
    fn open_episode(&mut self, _flag: &str) {}

    /// Called once when the episode ends.
    fn close_episode(&mut self, _flag: &str) {}

    /// Produces this agent's action for `board`.
    fn take_action(&mut self, board: &Board) -> Option<Action>;

    /// Overwrites one configuration entry from a `key=value` token.
    fn notify(&mut self, message: &str) -> Result<(), ConfigError>;

    /// Returns the agent's display name.
    fn name(&self) -> &str;

    /// Returns the agent's role.
    fn role(&self) -> Role;
}
