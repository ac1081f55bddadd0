//! Account endpoints: registration, login, logout.
//!
//! `POST /api/auth/register` — Unprotected: create a clinician account
//! `POST /api/auth/login` — Unprotected: verify credentials, open a session
//! `POST /api/auth/logout` — Protected: end the current session

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::{hash_password, ApiContext, AuthedUser};
use crate::db::repository;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: i64,
}

/// `POST /api/auth/register` — create a clinician account.
///
/// A duplicate username is a recoverable form error (409), not a crash.
pub async fn register(
    State(ctx): State<ApiContext>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let name = req.name.trim();
    let username = req.username.trim();
    if name.is_empty() || username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Name, username and password are required".into(),
        ));
    }

    let conn = ctx.open_db()?;
    let id = repository::insert_user(&conn, name, username, &hash_password(&req.password))?;

    tracing::info!(username, "Clinician registered");
    Ok(Json(RegisterResponse { id }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
}

/// `POST /api/auth/login` — verify credentials and open a session.
///
/// Unknown username and wrong password produce the same 401.
pub async fn login(
    State(ctx): State<ApiContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let user = repository::get_user_by_username(&conn, req.username.trim())?
        .ok_or(ApiError::Unauthorized)?;

    if user.password_hash != hash_password(&req.password) {
        return Err(ApiError::Unauthorized);
    }

    let token = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.create(&user)
    };

    tracing::info!(username = %user.username, "Clinician logged in");
    Ok(Json(LoginResponse {
        token,
        name: user.name,
    }))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

/// `POST /api/auth/logout` — evict the current session.
pub async fn logout(
    State(ctx): State<ApiContext>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<LogoutResponse>, ApiError> {
    let logged_out = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.evict(&user.token)
    };
    Ok(Json(LogoutResponse { logged_out }))
}
