use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the clinic booking service
///
/// Loads `.env`, resolves configuration, applies the optional seed file and serves the REST API
/// until Ctrl-C.
///
/// # Environment Variables
/// - `CLINIC_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `CLINIC_SEED_FILE`: Optional YAML file of users to create at startup
/// - `CLINIC_PASSWORD_ITERATIONS`: PBKDF2 iterations for password hashes (default: 100000)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, seeding or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("api_shared=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Arc::new(api_rest::config_from_env()?);
    tracing::info!("++ Starting clinic REST on {}", cfg.rest_addr());

    let state = api_rest::build_state(cfg)?;
    api_rest::serve(state, async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for shutdown signal: {err}");
        }
    })
    .await?;

    tracing::info!("-- Clinic REST stopped");
    Ok(())
}
