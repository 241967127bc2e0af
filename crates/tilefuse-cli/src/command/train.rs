use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;

use tilefuse_engine::MAX_EXPONENT;
use tilefuse_stats::{descriptive::DescriptiveStats, histogram::Histogram};
use tilefuse_training::{
    agent::Agent as _,
    config::{AgentConfig, InitScheme},
    environment::SpawnerAgent,
    selfplay::run_episode,
    td::TdPlayer,
};

use crate::{report::TrainingReport, util};

// Tile exponents called out in progress blocks: 2048, 4096, 8192.
const REPORT_EXPONENTS: [u8; 3] = [11, 12, 13];

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of self-play training episodes
    #[arg(long, default_value_t = 100_000)]
    episodes: usize,
    /// Learning rate applied to every tuple table
    #[arg(long, default_value_t = 0.003_125)]
    alpha: f32,
    /// n-step TD horizon
    #[arg(long, default_value_t = 1)]
    n_step: usize,
    /// Weight-initialization scheme (`zero` or `normal:SIGMA`)
    #[arg(long, default_value = "zero")]
    init: InitScheme,
    /// Seed for the environment's spawn stream
    #[arg(long)]
    seed: Option<u64>,
    /// Weight file to resume from
    #[arg(long)]
    load: Option<PathBuf>,
    /// Weight file written when training finishes
    #[arg(long)]
    save: Option<PathBuf>,
    /// Episodes per progress block
    #[arg(long, default_value_t = 1000)]
    block: usize,
    /// Optional path for a JSON training report
    #[arg(long)]
    report: Option<PathBuf>,
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        episodes,
        alpha,
        n_step,
        init,
        seed,
        load,
        save,
        block,
        report,
    } = arg;
    anyhow::ensure!(*episodes > 0, "--episodes must be at least 1");
    anyhow::ensure!(*n_step > 0, "--n-step must be at least 1");
    anyhow::ensure!(*block > 0, "--block must be at least 1");

    let player_config = AgentConfig {
        name: Some("td".to_owned()),
        role: Some("player".to_owned()),
        seed: *seed,
        alpha: *alpha,
        init: *init,
        load: load.clone(),
        save: save.clone(),
        n_step: *n_step,
        ..AgentConfig::default()
    };
    // A weight file that cannot be restored is fatal; bail before playing.
    let mut player =
        TdPlayer::from_config(player_config).context("Failed to build the TD player")?;

    let environment_config = AgentConfig {
        name: Some("spawner".to_owned()),
        role: Some("environment".to_owned()),
        seed: *seed,
        ..AgentConfig::default()
    };
    let mut environment = SpawnerAgent::from_config(environment_config);

    eprintln!(
        "Training {} for {episodes} episodes (alpha {alpha}, n-step {n_step})",
        player.name()
    );

    let buckets = usize::from(MAX_EXPONENT) + 1;
    let mut scores = Vec::with_capacity(*episodes);
    let mut achievements = Histogram::with_buckets(buckets);
    let mut block_scores = Vec::with_capacity(*block);
    let mut block_achievements = Histogram::with_buckets(buckets);

    for episode in 1..=*episodes {
        let outcome = run_episode(&mut player, &mut environment, "train");
        let score = outcome.stats.score() as f32;
        let max_exponent = usize::from(outcome.stats.max_exponent());

        scores.push(score);
        achievements.record(max_exponent);
        block_scores.push(score);
        block_achievements.record(max_exponent);

        if episode % block == 0 {
            let stats = DescriptiveStats::new(block_scores.iter().copied())
                .expect("progress blocks are never empty");
            eprintln!("Episode #{episode}:");
            eprintln!(
                "  Score: mean {:.1}, median {:.1}, max {:.0}",
                stats.mean, stats.median, stats.max
            );
            for exponent in REPORT_EXPONENTS {
                eprintln!(
                    "  Reach {:>5}: {:.1}%",
                    1u32 << exponent,
                    block_achievements.rate_at_least(usize::from(exponent)) * 100.0
                );
            }
            block_scores.clear();
            block_achievements = Histogram::with_buckets(buckets);
        }
    }

    if let Some(path) = save {
        player.save_weights().context("Failed to save weight tables")?;
        eprintln!("Weights saved to {}", path.display());
    }

    let overall =
        DescriptiveStats::new(scores.iter().copied()).expect("at least one episode was played");
    eprintln!("Training completed.");
    eprintln!(
        "  Score: mean {:.1}, median {:.1}, max {:.0}",
        overall.mean, overall.median, overall.max
    );

    if let Some(report_path) = report {
        let summary = TrainingReport {
            name: player.name().to_owned(),
            trained_at: Utc::now(),
            episodes: *episodes,
            alpha: *alpha,
            n_step: *n_step,
            mean_score: overall.mean,
            max_score: overall.max,
            reach_2048_rate: achievements.rate_at_least(11),
            reach_4096_rate: achievements.rate_at_least(12),
        };
        util::save_json(&summary, Some(report_path.as_path()))?;
        eprintln!("Report saved to {}", report_path.display());
    }

    Ok(())
}
