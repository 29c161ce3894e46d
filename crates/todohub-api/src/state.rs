//! Application state shared across all handlers.

use std::sync::Arc;

use todohub_auth::gate::AuthorizationGate;
use todohub_auth::jwt::{JwtDecoder, JwtEncoder};
use todohub_auth::password::PasswordHasher;
use todohub_auth::reset::PasswordResetFlow;
use todohub_auth::session::{RefreshChain, SessionManager};
use todohub_core::config::AppConfig;

use todohub_database::connection::DatabasePool;
use todohub_database::repositories::grant::RoleGrantRepository;
use todohub_database::repositories::password_reset::PasswordResetRepository;
use todohub_database::repositories::refresh_token::RefreshTokenRepository;
use todohub_database::repositories::revocation::SessionRevocationRepository;
use todohub_database::repositories::session::SessionRepository;
use todohub_database::repositories::user::UserRepository;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL connection pool wrapper
    pub db: DatabasePool,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token encoder
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,
    /// Per-request authorization gate
    pub gate: Arc<AuthorizationGate>,
    /// Session lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// Refresh token rotation chain
    pub refresh_chain: Arc<RefreshChain>,
    /// Password reset flow
    pub reset_flow: Arc<PasswordResetFlow>,

    // ── Repositories ─────────────────────────────────────────
    /// User repository
    pub user_repo: Arc<UserRepository>,
    /// Role grant repository
    pub grant_repo: Arc<RoleGrantRepository>,
    /// Session repository
    pub session_repo: Arc<SessionRepository>,
    /// Refresh token repository
    pub token_repo: Arc<RefreshTokenRepository>,
    /// Session revocation repository
    pub revocation_repo: Arc<SessionRevocationRepository>,
    /// Password reset repository
    pub reset_repo: Arc<PasswordResetRepository>,
}
