//! Session-token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, validates it against the
//! session store (refreshing the sliding expiry), and injects
//! `AuthedUser` into request extensions for downstream handlers.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthedUser};

/// Require a valid session token on the request.
///
/// Accesses `ApiContext` from request extensions (injected by Extension
/// layer). On success: injects `AuthedUser` for the handler.
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    // 1. Extract bearer token
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    // 2. Validate + refresh sliding expiry. Unknown and expired tokens
    //    are indistinguishable to the client.
    let identity = {
        let mut sessions = ctx
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock".into()))?;
        sessions.touch(&token).ok_or(ApiError::Unauthorized)?
    };

    // 3. Inject session context for downstream handlers
    req.extensions_mut().insert(AuthedUser {
        token,
        user_id: identity.user_id,
        username: identity.username,
        doctor_name: identity.doctor_name,
    });

    Ok(next.run(req).await)
}
