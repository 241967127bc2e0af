use tilefuse_engine::{Board, EpisodeStats};

use crate::agent::Agent;

/// Result of one completed self-play episode.
#[derive(Debug, Clone)]
pub struct EpisodeOutcome {
    pub stats: EpisodeStats,
    pub final_board: Board,
}

/// Plays one full episode between a player-role and an environment-role
/// agent on a fresh board.
///
/// The environment takes the two opening turns that seed the board, then
/// play alternates: the player slides, the environment spawns. The episode
/// ends when either agent has no legal action, which for a standard game
/// means the player can no longer slide. Both agents get their
/// `open_episode`/`close_episode` calls; the TD player performs its learning
/// pass inside `close_episode`.
pub fn run_episode(
    player: &mut dyn Agent,
    environment: &mut dyn Agent,
    flag: &str,
) -> EpisodeOutcome {
    let mut board = Board::new();
    let mut stats = EpisodeStats::new();

    player.open_episode(flag);
    environment.open_episode(flag);

    for _ in 0..2 {
        if let Some(opening) = environment.take_action(&board) {
            opening.apply(&mut board);
        }
    }

    loop {
        let Some(action) = player.take_action(&board) else {
            break;
        };
        let Some(reward) = action.apply(&mut board) else {
            break;
        };
        stats.record_slide(reward);
        stats.observe_board(&board);

        let Some(spawn) = environment.take_action(&board) else {
            break;
        };
        if spawn.apply(&mut board).is_none() {
            break;
        }
    }

    player.close_episode(flag);
    environment.close_episode(flag);

    EpisodeOutcome {
        stats,
        final_board: board,
    }
}
