//! Blank Wars Engine - Main entry point.
//!
//! Runs the per-turn loop: every interval, each character either keeps its
//! pending financial decision or rolls for a new one.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blankwars_engine::infrastructure::config::EngineConfig;
use blankwars_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the binary may run from `crates/engine`).
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blankwars_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Blank Wars Engine");

    let config = EngineConfig::from_env();
    let app = App::from_config(&config).await?;

    let mut interval = tokio::time::interval(config.turn_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    tracing::info!(
        turn_interval_secs = config.turn_interval_secs,
        "Turn loop running, press Ctrl+C to stop"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => run_turn(&app).await,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

/// One turn over every character. A failure for one character never stops the others.
async fn run_turn(app: &App) {
    let character_ids = match app.repositories.character.list_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list characters");
            return;
        }
    };

    let started = std::time::Instant::now();
    let mut pending = 0usize;
    for character_id in character_ids {
        match app.use_cases.financial.poll.execute(character_id).await {
            Ok(Some(_)) => pending += 1,
            Ok(None) => {}
            Err(e) => {
                tracing::error!(
                    character_id = %character_id,
                    error = %e,
                    "Financial decision poll failed"
                );
            }
        }
    }

    tracing::debug!(
        pending,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Turn complete"
    );
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
