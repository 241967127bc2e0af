use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary of a finished training run, exported as JSON next to the binary
/// weight file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Name of the trained player.
    pub name: String,
    /// When training finished.
    pub trained_at: DateTime<Utc>,
    /// Number of self-play episodes played.
    pub episodes: usize,
    /// Learning rate used.
    pub alpha: f32,
    /// n-step TD horizon used.
    pub n_step: usize,
    /// Mean episode score over the whole run.
    pub mean_score: f32,
    /// Best episode score over the whole run.
    pub max_score: f32,
    /// Fraction of episodes that reached the 2048 tile.
    pub reach_2048_rate: f32,
    /// Fraction of episodes that reached the 4096 tile.
    pub reach_4096_rate: f32,
}
