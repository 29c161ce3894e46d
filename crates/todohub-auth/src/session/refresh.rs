//! Refresh token rotation — the single-use exchange state machine.
//!
//! Per token the states are `ACTIVE → ROTATED` (replaced by a child),
//! `ACTIVE → REVOKED` (explicit kill), or `ACTIVE → EXPIRED` (detected
//! lazily at use time); all three are terminal. Rotated rows are kept so a
//! replayed secret fails deterministically instead of looking like a bad
//! guess — that is what makes token theft observable.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use todohub_core::error::AppError;
use todohub_database::repositories::grant::RoleGrantRepository;
use todohub_database::repositories::refresh_token::RefreshTokenRepository;
use todohub_database::repositories::session::SessionRepository;
use todohub_database::repositories::user::UserRepository;
use todohub_entity::user::role::Role;

use crate::gate;
use crate::jwt::JwtEncoder;
use crate::secret;

/// Result of a successful refresh exchange.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RefreshedTokens {
    /// The principal the chain belongs to; invariant across the whole chain.
    pub user_id: Uuid,
    /// Fresh signed access token.
    pub access: String,
    /// Fresh opaque refresh secret; the presented one is now dead.
    pub refresh: String,
    /// Access token expiry.
    pub expired_at: DateTime<Utc>,
    /// End of the refresh window (the session expiry).
    pub refreshable_until: DateTime<Utc>,
}

/// Rotates single-use refresh tokens chained to a session.
#[derive(Debug, Clone)]
pub struct RefreshChain {
    /// Shared connection pool, used to open the rotation transaction.
    pool: PgPool,
    /// Refresh token repository.
    tokens: Arc<RefreshTokenRepository>,
    /// Session repository.
    sessions: Arc<SessionRepository>,
    /// Principal repository.
    users: Arc<UserRepository>,
    /// Role grant repository.
    grants: Arc<RoleGrantRepository>,
    /// Access token encoder.
    encoder: Arc<JwtEncoder>,
}

impl RefreshChain {
    /// Creates a new refresh chain with all required dependencies.
    pub fn new(
        pool: PgPool,
        tokens: Arc<RefreshTokenRepository>,
        sessions: Arc<SessionRepository>,
        users: Arc<UserRepository>,
        grants: Arc<RoleGrantRepository>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            pool,
            tokens,
            sessions,
            users,
            grants,
            encoder,
        }
    }

    /// Exchanges a presented refresh secret for a new token pair.
    ///
    /// Every credential-shaped failure is the same `Unauthorized`; the
    /// response never distinguishes an unknown secret from a consumed,
    /// revoked, or expired one. A principal that no longer holds a live
    /// grant for `role` gets `Forbidden`.
    pub async fn refresh(&self, role: Role, presented: &str) -> Result<RefreshedTokens, AppError> {
        let now = Utc::now();

        let token = self
            .tokens
            .find_by_hash(&secret::digest(presented))
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        if !token.is_usable(now) {
            if token.rotated_at.is_some() {
                // A rotated secret coming back is the replay signature.
                warn!(
                    token_id = %token.id,
                    session_id = %token.session_id,
                    "Rotated refresh token replayed"
                );
            }
            return Err(AppError::unauthorized("Invalid refresh token"));
        }

        let session = self
            .sessions
            .find_by_id(token.session_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;
        if !session.is_active(now) {
            return Err(AppError::unauthorized("Invalid refresh token"));
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("Account no longer exists"))?;
        let grant = self.grants.find_live(user.id, role).await?;
        gate::evaluate(&user, grant.as_ref(), role, now)?;

        // Rotation and child creation commit together; the check-and-set on
        // rotated_at settles concurrent exchanges of the same secret.
        let new_secret = secret::generate();
        let mut tx = self.pool.begin().await?;

        let claimed = self.tokens.mark_rotated_tx(&mut tx, token.id).await?;
        if !claimed {
            // Lost the race: another caller rotated this token first.
            return Err(AppError::unauthorized("Invalid refresh token"));
        }

        let child = self
            .tokens
            .create_tx(
                &mut tx,
                session.id,
                Some(token.id),
                &secret::digest(&new_secret),
                session.expires_at,
            )
            .await?;
        self.sessions.touch_tx(&mut tx, session.id).await?;
        tx.commit().await?;

        let (access, expired_at) = self
            .encoder
            .issue_access_token(user.id, session.id, role)?;

        info!(
            user_id = %user.id,
            session_id = %session.id,
            parent_id = %token.id,
            child_id = %child.id,
            "Refresh token rotated"
        );

        Ok(RefreshedTokens {
            user_id: user.id,
            access,
            refresh: new_secret,
            expired_at,
            refreshable_until: session.expires_at,
        })
    }
}
