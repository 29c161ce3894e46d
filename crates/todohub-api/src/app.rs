//! Application builder — wires repositories, auth components, and state
//! into an Axum app.

use std::sync::Arc;

use axum::Router;

use todohub_auth::gate::AuthorizationGate;
use todohub_auth::jwt::{JwtDecoder, JwtEncoder};
use todohub_auth::password::{PasswordHasher, PasswordValidator};
use todohub_auth::reset::PasswordResetFlow;
use todohub_auth::session::{RefreshChain, SessionManager};
use todohub_core::config::AppConfig;
use todohub_core::error::AppError;
use todohub_database::connection::DatabasePool;
use todohub_database::repositories::grant::RoleGrantRepository;
use todohub_database::repositories::password_reset::PasswordResetRepository;
use todohub_database::repositories::refresh_token::RefreshTokenRepository;
use todohub_database::repositories::revocation::SessionRevocationRepository;
use todohub_database::repositories::session::SessionRepository;
use todohub_database::repositories::user::UserRepository;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the application state from configuration and a live pool.
pub fn build_state(config: AppConfig, db: DatabasePool) -> AppState {
    let db_pool = db.pool().clone();

    // ── Repositories ─────────────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let grant_repo = Arc::new(RoleGrantRepository::new(db_pool.clone()));
    let session_repo = Arc::new(SessionRepository::new(db_pool.clone()));
    let token_repo = Arc::new(RefreshTokenRepository::new(db_pool.clone()));
    let revocation_repo = Arc::new(SessionRevocationRepository::new(db_pool.clone()));
    let reset_repo = Arc::new(PasswordResetRepository::new(db_pool.clone()));

    // ── Auth components ──────────────────────────────────────────
    let password_hasher = Arc::new(PasswordHasher::new());
    let password_validator = Arc::new(PasswordValidator::new(&config.auth));
    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let gate = Arc::new(AuthorizationGate::new(
        Arc::clone(&jwt_decoder),
        Arc::clone(&user_repo),
        Arc::clone(&grant_repo),
        Arc::clone(&session_repo),
    ));

    let session_manager = Arc::new(SessionManager::new(
        db_pool.clone(),
        Arc::clone(&user_repo),
        Arc::clone(&grant_repo),
        Arc::clone(&session_repo),
        Arc::clone(&token_repo),
        Arc::clone(&revocation_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
        Arc::clone(&jwt_encoder),
        config.auth.clone(),
    ));

    let refresh_chain = Arc::new(RefreshChain::new(
        db_pool.clone(),
        Arc::clone(&token_repo),
        Arc::clone(&session_repo),
        Arc::clone(&user_repo),
        Arc::clone(&grant_repo),
        Arc::clone(&jwt_encoder),
    ));

    let reset_flow = Arc::new(PasswordResetFlow::new(
        db_pool.clone(),
        Arc::clone(&user_repo),
        Arc::clone(&reset_repo),
        Arc::clone(&session_repo),
        Arc::clone(&token_repo),
        Arc::clone(&revocation_repo),
        Arc::clone(&password_hasher),
        Arc::clone(&password_validator),
        config.auth.clone(),
    ));

    AppState {
        config: Arc::new(config),
        db,
        jwt_encoder,
        jwt_decoder,
        password_hasher,
        gate,
        session_manager,
        refresh_chain,
        reset_flow,
        user_repo,
        grant_repo,
        session_repo,
        token_repo,
        revocation_repo,
        reset_repo,
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the TodoHub server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(config, db.clone());
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("TodoHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
