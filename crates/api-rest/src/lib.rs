//! # API REST
//!
//! REST API implementation for the clinic booking system.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Caller identity extraction and role checks against the `clinic-core` access table
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, cookies, CORS)
//!
//! Uses `api-shared` for the identity provider and shared wire types.

#![warn(rust_2018_idioms)]

pub mod caller;
pub mod error;
pub mod handlers;
pub mod router;
pub mod session;

use api_shared::seed::{load_seed_file, seed_users};
use api_shared::{AuthService, PasswordHasher};
use clinic_core::{ClinicResult, CoreConfig, MemStorage, Storage};
use std::future::Future;
use std::sync::Arc;

pub use error::ApiError;
pub use router::{router, ApiDoc};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub storage: Arc<dyn Storage>,
    pub auth: AuthService,
}

impl AppState {
    /// Fresh in-memory state. Nothing is seeded.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let storage: Arc<dyn Storage> = Arc::new(MemStorage::new());
        let auth = AuthService::new(
            storage.clone(),
            PasswordHasher::new(cfg.password_iterations()),
            cfg.session_ttl(),
        );
        Self { cfg, storage, auth }
    }
}

/// Resolve configuration from `CLINIC_*` environment variables.
///
/// # Environment Variables
/// - `CLINIC_REST_ADDR`: Server address (default: "0.0.0.0:5000")
/// - `CLINIC_SEED_FILE`: Optional YAML file of users to create at startup
/// - `CLINIC_PASSWORD_ITERATIONS`: PBKDF2 iterations for password hashes (default: 100000)
/// - `CLINIC_SESSION_TTL_SECS`: Session lifetime in seconds (default: 86400)
pub fn config_from_env() -> ClinicResult<CoreConfig> {
    CoreConfig::from_env_values(
        std::env::var("CLINIC_REST_ADDR").ok(),
        std::env::var("CLINIC_SEED_FILE").ok(),
        std::env::var("CLINIC_PASSWORD_ITERATIONS").ok(),
        std::env::var("CLINIC_SESSION_TTL_SECS").ok(),
    )
}

/// Build the application state and apply the configured seed file, if any.
///
/// # Errors
/// Returns an error if the seed file cannot be read or parsed, or any seeded user is rejected.
pub fn build_state(cfg: Arc<CoreConfig>) -> anyhow::Result<AppState> {
    let state = AppState::new(cfg.clone());

    if let Some(path) = cfg.seed_file() {
        let users = load_seed_file(path)?;
        let created = seed_users(&state.auth, users)?;
        tracing::info!("seeded {} users from {}", created.len(), path.display());
    }

    Ok(state)
}

/// Bind the configured address and serve until `shutdown` resolves.
///
/// # Errors
/// Returns an error if the server address cannot be bound or the HTTP server fails.
pub async fn serve(
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let addr = state.cfg.rest_addr().to_string();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
