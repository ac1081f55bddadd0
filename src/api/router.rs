//! API router.
//!
//! Two route groups nested under `/api/`:
//! - unprotected: register, login
//! - protected: everything else, behind the session-auth middleware
//!
//! Middleware uses `Extension<ApiContext>` (injected as the outermost
//! layer). Endpoint handlers use `State<ApiContext>` (via `with_state`).

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router.
///
/// Takes a pre-constructed `ApiContext` so tests (and `main`) control the
/// database location and the completion backend.
pub fn api_router(ctx: ApiContext) -> Router {
    // Layers apply bottom (innermost) to top (outermost):
    //   Extension → Auth → Handler
    // Extension must be outermost so the auth middleware can read ApiContext.
    let protected = Router::new()
        .route("/auth/logout", post(endpoints::auth::logout))
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::add),
        )
        .route("/patients/:id", get(endpoints::patients::detail))
        .route("/patients/:id/assistant", get(endpoints::assistant::open))
        .route("/assistant/chat", post(endpoints::assistant::chat))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::Extension(ctx.clone()));

    let unprotected = Router::new()
        .route("/auth/register", post(endpoints::auth::register))
        .route("/auth/login", post(endpoints::auth::login))
        .with_state(ctx.clone())
        .layer(axum::Extension(ctx));

    Router::new()
        .nest("/api", protected)
        .nest("/api", unprotected)
        .layer(TraceLayer::new_for_http())
}
