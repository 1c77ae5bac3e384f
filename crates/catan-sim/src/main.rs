//! Runs seeded random-placement rollouts on a fresh board.

use anyhow::ensure;
use catan_board::Board;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod rollout;

use config::SimConfig;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SimConfig::from_env()?;
    info!(?config, "Starting rollouts");

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut board = Board::with_rng(&mut rng)?;
    rollout::setup(&mut board, config.players, &mut rng)?;
    let authoritative = board.snapshot();

    for player in 0..config.players {
        info!(
            player,
            expected_yield = rollout::expected_yield(&board, player),
            harbors = ?board.player_harbors(player),
            "Setup complete"
        );
    }

    for index in 0..config.rollouts {
        for tally in rollout::run(&board, config.players, config.rounds, &mut rng)? {
            info!(
                rollout = index,
                player = tally.player,
                settlements = tally.settlements,
                cities = tally.cities,
                roads = tally.roads,
                expected_yield = tally.expected_yield,
                "Rollout finished"
            );
        }
    }

    ensure!(
        board.snapshot() == authoritative,
        "Rollouts modified the authoritative board"
    );
    Ok(())
}
