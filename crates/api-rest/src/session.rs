//! Registration, login and session endpoints backed by the identity provider.

use api_shared::{AuthError, AuthService, LoginReq, MessageRes, RegisterReq, SessionRes};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinic_core::{Operation, User};

use crate::caller::{expired_session_cookie, session_cookie, Caller};
use crate::error::ApiError;
use crate::AppState;

fn signed_in(state: &AppState, status: StatusCode, user: User, token: String) -> Response {
    let cookie = session_cookie(&token, state.auth.session_ttl());
    (
        status,
        [(header::SET_COOKIE, cookie)],
        Json(SessionRes { user, token }),
    )
        .into_response()
}

/// Run password hashing work off the async workers.
async fn hashing<T, F>(state: &AppState, work: F) -> Result<T, ApiError>
where
    F: FnOnce(AuthService) -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    let auth = state.auth.clone();
    tokio::task::spawn_blocking(move || work(auth))
        .await
        .map_err(|err| ApiError::Internal(format!("password hashing task failed: {err}")))?
        .map_err(ApiError::from)
}

#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterReq,
    responses(
        (status = 201, description = "User created and signed in", body = SessionRes),
        (status = 400, description = "Invalid form or username already exists", body = MessageRes)
    )
)]
/// Create an account and start a session for it.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterReq>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let (user, token) = hashing(&state, move |auth| auth.register(req)).await?;
    Ok(signed_in(&state, StatusCode::CREATED, user, token))
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Signed in", body = SessionRes),
        (status = 400, description = "Malformed credentials", body = MessageRes),
        (status = 401, description = "Invalid username or password", body = MessageRes)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginReq>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let (user, token) = hashing(&state, move |auth| auth.login(req)).await?;
    Ok(signed_in(&state, StatusCode::OK, user, token))
}

#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Session ended", body = MessageRes)
    )
)]
/// End the caller's session. Succeeds for anonymous callers too.
pub async fn logout(State(state): State<AppState>, caller: Caller) -> Result<Response, ApiError> {
    if let Some(token) = &caller.token {
        state.auth.logout(token)?;
    }
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, expired_session_cookie())],
        Json(MessageRes::new("Logged out")),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "The signed-in user", body = User),
        (status = 401, description = "Not authenticated", body = MessageRes)
    )
)]
pub async fn current_user(caller: Caller) -> Result<Json<User>, ApiError> {
    caller.authorize(Operation::CurrentUser)?;
    caller.user.map(Json).ok_or(ApiError::Unauthenticated)
}
