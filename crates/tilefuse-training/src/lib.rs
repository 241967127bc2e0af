//! Self-play agents and the TD-learning player.
//!
//! This crate implements the agent layer on top of the engine and the value
//! network:
//!
//! 1. **Agent protocol** ([`agent`]) - The capability interface every agent
//!    implements, with the player and environment roles.
//! 2. **Configuration** ([`config`]) - Typed agent configuration parsed once
//!    from `key=value` token strings.
//! 3. **Environment** ([`environment`]) - The environment-role agent wrapping
//!    the stochastic tile spawner.
//! 4. **Baselines** ([`baseline`]) - Non-learning players (random and greedy
//!    variants) used as references.
//! 5. **TD player** ([`td`]) - The learning player: expectimax action
//!    selection over the analytic spawn distribution, an episode history of
//!    (reward, afterstate) steps, and a backward n-step TD(0) replay at
//!    episode close.
//! 6. **Self-play** ([`selfplay`]) - The episode runner alternating player
//!    and environment turns on one shared board.
//!
//! # Learning flow
//!
//! ```text
//! run_episode
//!     -> player.take_action   (expectimax, records (reward, afterstate))
//!     -> environment.take_action (random spawn)
//!     -> ... until no legal slide ...
//!     -> player.close_episode (backward n-step TD updates)
//! ```
//!
//! Learning happens only at the episode boundary, never concurrently with
//! search; everything here is single-threaded by design.

pub mod agent;
pub mod baseline;
pub mod config;
pub mod environment;
pub mod selfplay;
pub mod td;
