use tilefuse_engine::{Action, Board, TileSpawner};

use crate::{
    agent::{Agent, Role},
    config::{AgentConfig, ConfigError},
};

/// The environment-role agent: spawns one random tile per turn.
///
/// Wraps [`TileSpawner`] behind the agent protocol. The spawner's random
/// stream is seeded from the `seed` configuration key when present, which
/// makes whole episodes reproducible.
#[derive(Debug)]
pub struct SpawnerAgent {
    config: AgentConfig,
    spawner: TileSpawner,
}

impl SpawnerAgent {
    /// Creates an environment agent from its configuration.
    #[must_use]
    pub fn from_config(config: AgentConfig) -> Self {
        let spawner = match config.seed {
            Some(seed) => TileSpawner::with_seed(seed),
            None => TileSpawner::new(),
        };
        Self { config, spawner }
    }

    /// Creates an environment agent with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(AgentConfig::default())
    }
}

impl Default for SpawnerAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for SpawnerAgent {
    fn take_action(&mut self, board: &Board) -> Option<Action> {
        self.spawner.spawn_action(board)
    }

    fn notify(&mut self, message: &str) -> Result<(), ConfigError> {
        self.config.apply_token(message)
    }

    fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or("spawner")
    }

    fn role(&self) -> Role {
        Role::Environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawns_until_board_is_full() {
        let config = AgentConfig {
            seed: Some(3),
            ..AgentConfig::default()
        };
        let mut agent = SpawnerAgent::from_config(config);
        let mut board = Board::new();

        for turn in 0..16 {
            let action = agent
                .take_action(&board)
                .unwrap_or_else(|| panic!("board has empty cells at turn {turn}"));
            assert_eq!(action.apply(&mut board), Some(0));
        }
        assert!(board.empty_cells().is_empty());
        assert_eq!(agent.take_action(&board), None);
    }

    #[test]
    fn test_role_and_name() {
        let mut agent = SpawnerAgent::new();
        assert_eq!(agent.role(), Role::Environment);
        assert_eq!(agent.name(), "spawner");
        agent.notify("name=evil").unwrap();
        assert_eq!(agent.name(), "evil");
    }
}
