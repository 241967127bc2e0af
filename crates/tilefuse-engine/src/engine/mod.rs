pub use self::{action::*, episode_stats::*, spawner::*};

pub(crate) mod action;
pub(crate) mod episode_stats;
pub(crate) mod spawner;
