//! Wire types shared by the API crates that are not part of the core data model.

use clinic_core::{Role, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Body of every error response, and of responses that only carry a status message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Registration form. `role` defaults to patient when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
    pub role: Option<Role>,
    pub name: String,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub medical_history: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

/// A signed-in user plus the session token that was issued for them.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionRes {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}
