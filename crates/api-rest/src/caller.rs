//! Caller identity extraction.
//!
//! Reads the session token from the `clinic.sid` cookie or an `Authorization: Bearer` header
//! and resolves it through the identity provider. Extraction never rejects a request for lack
//! of identity; handlers decide via the access control table.

use api_shared::{Identity, SESSION_COOKIE};
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use clinic_core::{Operation, Role, User};
use std::time::Duration;

use crate::error::ApiError;
use crate::AppState;

/// The (possibly anonymous) caller of a request.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Caller {
    pub fn identity(&self) -> Option<Identity> {
        self.user.as_ref().map(Identity::from)
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    /// Admits or rejects this caller for `op`, returning the identity when there is one.
    pub fn authorize(&self, op: Operation) -> Result<Option<Identity>, ApiError> {
        op.authorize(self.role())?;
        Ok(self.identity())
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(&parts.headers) else {
            return Ok(Caller::default());
        };
        let user = state.auth.current_user(&token)?;
        if user.is_none() {
            tracing::debug!("request carried an unknown session token");
        }
        Ok(Caller {
            user,
            token: Some(token),
        })
    }
}

/// Bearer token first, then the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value for a new session; the browser drops it when the session expires.
pub fn session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        ttl.as_secs()
    )
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}
