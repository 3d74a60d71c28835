//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services. Request
//! handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_PASSWORD_ITERATIONS, DEFAULT_REST_ADDR, DEFAULT_SESSION_TTL_SECS};
use crate::{ClinicError, ClinicResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    rest_addr: String,
    seed_file: Option<PathBuf>,
    password_iterations: u32,
    session_ttl: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        rest_addr: String,
        seed_file: Option<PathBuf>,
        password_iterations: u32,
    ) -> ClinicResult<Self> {
        if rest_addr.trim().is_empty() {
            return Err(ClinicError::InvalidInput(
                "rest_addr cannot be empty".into(),
            ));
        }
        if password_iterations == 0 {
            return Err(ClinicError::InvalidInput(
                "password_iterations must be at least 1".into(),
            ));
        }

        Ok(Self {
            rest_addr,
            seed_file,
            password_iterations,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        })
    }

    /// Replace the session lifetime.
    pub fn with_session_ttl(mut self, session_ttl: Duration) -> Self {
        self.session_ttl = session_ttl;
        self
    }

    /// Build a configuration from raw environment values.
    ///
    /// Empty or whitespace-only values count as unset. The caller does the actual reading so
    /// that this stays testable without touching the process environment.
    pub fn from_env_values(
        rest_addr: Option<String>,
        seed_file: Option<String>,
        password_iterations: Option<String>,
        session_ttl_secs: Option<String>,
    ) -> ClinicResult<Self> {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let rest_addr = non_blank(rest_addr).unwrap_or_else(|| DEFAULT_REST_ADDR.into());
        let seed_file = non_blank(seed_file).map(PathBuf::from);
        let password_iterations = non_blank(password_iterations)
            .map(|v| {
                v.parse::<u32>().map_err(|_| {
                    ClinicError::InvalidInput(format!(
                        "password iterations must be a positive integer, got '{v}'"
                    ))
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_PASSWORD_ITERATIONS);
        let session_ttl_secs = match non_blank(session_ttl_secs) {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ClinicError::InvalidInput(format!(
                        "session TTL must be a positive number of seconds, got '{v}'"
                    )))
                }
            },
            None => DEFAULT_SESSION_TTL_SECS,
        };

        Ok(Self::new(rest_addr, seed_file, password_iterations)?
            .with_session_ttl(Duration::from_secs(session_ttl_secs)))
    }

    pub fn rest_addr(&self) -> &str {
        &self.rest_addr
    }

    pub fn seed_file(&self) -> Option<&Path> {
        self.seed_file.as_deref()
    }

    pub fn password_iterations(&self) -> u32 {
        self.password_iterations
    }

    /// How long a session stays valid after login or registration.
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}
