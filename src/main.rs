// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Extraction-Planner API Server
//!
//! Serves the ask/tell loop for liquid-liquid extraction development:
//! suggested trial conditions out, measured objectives in, Pareto
//! analytics on demand.

use extraction_planner::{config::Config, db::Store, services::DesignService, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Extraction-Planner API");

    // Open the store, restoring the snapshot if one is configured
    let store = Store::open(config.snapshot_path.clone()).expect("Failed to open store");
    if let Some(path) = &config.snapshot_path {
        tracing::info!(path = %path.display(), "Snapshot persistence enabled");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        designer: DesignService::new(),
    });

    // Build router
    let app = extraction_planner::routes::create_router(state);

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
                .add_directive("extraction_planner=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
