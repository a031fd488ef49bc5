//! Travel Planner - HTTP Server Entry Point
//!
//! Starts the HTTP server that serves the planner form.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use travel_planner::{api, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real env vars still apply
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_planner=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; a missing API key stops here, before anything is served
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={} mode={:?}",
        config.model, config.planner_mode
    );

    api::serve(config).await?;

    Ok(())
}
