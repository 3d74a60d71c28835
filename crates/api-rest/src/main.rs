//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the clinic booking REST API (with OpenAPI/Swagger UI) on its own.
//!
//! ## Intended use
//! Handy for development when you want the API crate's logging filter. The workspace's main
//! `clinic-run` binary serves the same router.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the REST API server
///
/// # Environment Variables
/// - `CLINIC_REST_ADDR`: Server address (default: "0.0.0.0:5000")
/// - `CLINIC_SEED_FILE`: Optional YAML file of users to create at startup
/// - `CLINIC_PASSWORD_ITERATIONS`: PBKDF2 iterations for password hashes
/// - `RUST_LOG`: Logging filter, on top of `api_rest=info`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(api_rest::config_from_env()?);
    tracing::info!("-- Starting clinic REST API on {}", cfg.rest_addr());

    let state = api_rest::build_state(cfg)?;
    api_rest::serve(state, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for shutdown signal: {err}");
        }
    })
    .await
}
