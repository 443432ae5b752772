// SPDX-License-Identifier: MIT

//! LevelUp Tracker API Server
//!
//! Gamified fitness and nutrition tracking: quests, XP, levels, streaks, and
//! attribute ranks, with AI-assisted meal and body-composition estimates.

use levelup_tracker::{
    config::Config,
    db::BlobStore,
    services::{NutritionClient, VisionClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting LevelUp Tracker API");

    // Open the blob store
    let store = BlobStore::new(config.data_dir.clone()).expect("Failed to open blob store");

    // AI advisory clients (degrade gracefully without keys)
    let nutrition = NutritionClient::new(config.anthropic_api_key.clone());
    let vision = VisionClient::new(config.gemini_api_key.clone());
    if config.anthropic_api_key.is_none() {
        tracing::warn!("ANTHROPIC_API_KEY not set; nutrition estimation disabled");
    }
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; body-scan analysis disabled");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        sessions: dashmap::DashMap::new(),
        nutrition,
        vision,
    });

    // Build router
    let app = levelup_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("levelup_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
