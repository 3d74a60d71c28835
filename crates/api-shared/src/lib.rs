//! # API Shared
//!
//! Shared utilities and definitions for the clinic APIs.
//!
//! Contains:
//! - The session/identity provider (`auth`): password hashing, sessions, caller identity
//! - Wire types that are not part of the core data model (`types`)
//! - `HealthService`
//! - Start-up user seeding (`seed`)

pub mod auth;
pub mod health;
pub mod seed;
pub mod types;

pub use auth::{AuthError, AuthService, Identity, PasswordHasher, SESSION_COOKIE};
pub use health::HealthService;
pub use types::*;
