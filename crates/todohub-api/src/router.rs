//! Route definitions for the TodoHub HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(session_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Role-scoped auth endpoints plus logout and me.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/{role}/join", post(handlers::auth::join))
        .route("/auth/{role}/login", post(handlers::auth::login))
        .route("/auth/{role}/refresh", post(handlers::auth::refresh))
        .route(
            "/auth/{role}/password/reset/request",
            post(handlers::auth::reset_request),
        )
        .route(
            "/auth/{role}/password/reset/confirm",
            post(handlers::auth::reset_confirm),
        )
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Session listing and revocation endpoints.
fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/sessions", get(handlers::session::list_sessions))
        .route(
            "/auth/sessions/revoke",
            post(handlers::session::revoke_others),
        )
        .route(
            "/auth/sessions/revoke-one",
            post(handlers::session::revoke_session),
        )
}

/// Health endpoint.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
