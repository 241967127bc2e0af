use std::path::PathBuf;

use anyhow::Context as _;

use tilefuse_engine::MAX_EXPONENT;
use tilefuse_stats::{descriptive::DescriptiveStats, histogram::Histogram};
use tilefuse_training::{
    agent::Agent,
    baseline::{BaselinePlayer, PlayStyle},
    config::AgentConfig,
    environment::SpawnerAgent,
    selfplay::run_episode,
    td::TdPlayer,
};

/// Player selected for evaluation.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum PlayerKind {
    #[default]
    Td,
    Random,
    Greedy,
    Greedy2,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Which player to evaluate (td, random, greedy, greedy2)
    #[arg(long, default_value = "td")]
    player: PlayerKind,
    /// Number of evaluation episodes
    #[arg(long, default_value_t = 100)]
    episodes: usize,
    /// Weight file for the TD player
    #[arg(long)]
    load: Option<PathBuf>,
    /// Seed for stochastic agents and the environment
    #[arg(long)]
    seed: Option<u64>,
    /// Print the final board of every episode
    #[arg(long)]
    show_board: bool,
}

fn player_config(name: &str, arg: &PlayArg) -> AgentConfig {
    AgentConfig {
        name: Some(name.to_owned()),
        role: Some("player".to_owned()),
        seed: arg.seed,
        ..AgentConfig::default()
    }
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    anyhow::ensure!(arg.episodes > 0, "--episodes must be at least 1");

    // Evaluation never learns: the TD player keeps its default alpha of 0.
    let mut player: Box<dyn Agent> = match arg.player {
        PlayerKind::Td => {
            let config = AgentConfig {
                load: arg.load.clone(),
                ..player_config("td", arg)
            };
            Box::new(TdPlayer::from_config(config).context("Failed to build the TD player")?)
        }
        PlayerKind::Random => Box::new(BaselinePlayer::from_config(
            player_config("random", arg),
            PlayStyle::Random,
        )),
        PlayerKind::Greedy => Box::new(BaselinePlayer::from_config(
            player_config("greedy", arg),
            PlayStyle::Greedy,
        )),
        PlayerKind::Greedy2 => Box::new(BaselinePlayer::from_config(
            player_config("greedy2", arg),
            PlayStyle::Greedy2,
        )),
    };

    let environment_config = AgentConfig {
        name: Some("spawner".to_owned()),
        role: Some("environment".to_owned()),
        seed: arg.seed,
        ..AgentConfig::default()
    };
    let mut environment = SpawnerAgent::from_config(environment_config);

    let mut scores = Vec::with_capacity(arg.episodes);
    let mut slides = Vec::with_capacity(arg.episodes);
    let mut achievements = Histogram::with_buckets(usize::from(MAX_EXPONENT) + 1);

    for episode in 1..=arg.episodes {
        let outcome = run_episode(player.as_mut(), &mut environment, "evaluate");
        scores.push(outcome.stats.score() as f32);
        slides.push(outcome.stats.slides() as f32);
        achievements.record(usize::from(outcome.stats.max_exponent()));

        if arg.show_board {
            println!(
                "Episode #{episode}: score {}, {} slides",
                outcome.stats.score(),
                outcome.stats.slides()
            );
            println!("{}", outcome.final_board);
        }
    }

    let score_stats =
        DescriptiveStats::new(scores.iter().copied()).expect("at least one episode was played");
    let slide_stats =
        DescriptiveStats::new(slides.iter().copied()).expect("at least one episode was played");

    eprintln!("{} evaluation over {} episodes:", player.name(), arg.episodes);
    eprintln!(
        "  Score:  mean {:.1}, median {:.1}, max {:.0}",
        score_stats.mean, score_stats.median, score_stats.max
    );
    eprintln!(
        "  Slides: mean {:.1}, max {:.0}",
        slide_stats.mean, slide_stats.max
    );
    for exponent in [10u8, 11, 12, 13] {
        eprintln!(
            "  Reach {:>5}: {:.1}%",
            1u32 << exponent,
            achievements.rate_at_least(usize::from(exponent)) * 100.0
        );
    }

    Ok(())
}
