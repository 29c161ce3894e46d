//! Session lifecycle manager — join, login, and revocation flows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use todohub_core::config::auth::AuthConfig;
use todohub_core::error::AppError;
use todohub_database::repositories::grant::RoleGrantRepository;
use todohub_database::repositories::refresh_token::RefreshTokenRepository;
use todohub_database::repositories::revocation::SessionRevocationRepository;
use todohub_database::repositories::session::SessionRepository;
use todohub_database::repositories::user::UserRepository;
use todohub_entity::session::model::{ClientContext, Session};
use todohub_entity::user::model::{CreateUser, User};
use todohub_entity::user::role::Role;

use crate::gate;
use crate::jwt::JwtEncoder;
use crate::password::{PasswordHasher, PasswordValidator};
use crate::secret;

/// Token pair handed to a freshly authenticated client.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct IssuedTokens {
    /// Signed access token.
    pub access: String,
    /// Opaque refresh secret (root of a new rotation chain, or its child).
    pub refresh: String,
    /// Access token expiry.
    pub expired_at: DateTime<Utc>,
    /// End of the refresh window (the session expiry).
    pub refreshable_until: DateTime<Utc>,
}

/// Result of a successful join or login.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Authorized {
    /// The authenticated principal.
    pub id: Uuid,
    /// Issued token pair.
    pub token: IssuedTokens,
}

/// Result of a revoke-others call.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RevokeOthersOutcome {
    /// Number of sessions that actually transitioned to revoked.
    pub revoked_count: usize,
    /// IDs of the revoked sessions.
    pub revoked_ids: Vec<Uuid>,
}

/// Picks the one session to keep during revoke-others.
///
/// Prefers the caller's explicit current session when it is in the active
/// set; otherwise falls back to the oldest-issued session (the list is
/// ordered ascending by `issued_at`, so that is the first element).
pub(crate) fn select_kept_session(sessions: &[Session], explicit: Option<Uuid>) -> Option<Uuid> {
    if let Some(id) = explicit {
        if sessions.iter().any(|s| s.id == id) {
            return Some(id);
        }
    }
    sessions.first().map(|s| s.id)
}

/// Manages session creation and revocation.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Shared connection pool, used to open transaction scopes.
    pool: PgPool,
    /// Principal repository.
    users: Arc<UserRepository>,
    /// Role grant repository.
    grants: Arc<RoleGrantRepository>,
    /// Session repository.
    sessions: Arc<SessionRepository>,
    /// Refresh token repository.
    tokens: Arc<RefreshTokenRepository>,
    /// Revocation audit repository.
    revocations: Arc<SessionRevocationRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Password policy validator.
    validator: Arc<PasswordValidator>,
    /// Access token encoder.
    encoder: Arc<JwtEncoder>,
    /// Auth configuration.
    config: AuthConfig,
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        users: Arc<UserRepository>,
        grants: Arc<RoleGrantRepository>,
        sessions: Arc<SessionRepository>,
        tokens: Arc<RefreshTokenRepository>,
        revocations: Arc<SessionRevocationRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        encoder: Arc<JwtEncoder>,
        config: AuthConfig,
    ) -> Self {
        Self {
            pool,
            users,
            grants,
            sessions,
            tokens,
            revocations,
            hasher,
            validator,
            encoder,
            config,
        }
    }

    /// Registers a new principal under the given role and logs them in.
    ///
    /// Principal, grant, session, and root refresh token are inserted in one
    /// transaction; a duplicate email rolls everything back as `Conflict`.
    pub async fn join(
        &self,
        role: Role,
        email: &str,
        password: &str,
        client: &ClientContext,
    ) -> Result<Authorized, AppError> {
        if !role.is_joinable() {
            return Err(AppError::forbidden(format!(
                "Role '{role}' cannot self-register"
            )));
        }
        self.validator.validate(password)?;

        let email = normalize_email(email)?;
        let password_hash = self.hasher.hash_password(password)?;

        let mut tx = self.pool.begin().await?;
        let user = self
            .users
            .create_tx(
                &mut tx,
                &CreateUser {
                    email: email.clone(),
                    password_hash,
                },
            )
            .await?;
        self.grants.create_tx(&mut tx, user.id, role).await?;
        let (session, refresh) = self.open_session_tx(&mut tx, user.id, client).await?;
        tx.commit().await?;

        info!(user_id = %user.id, role = %role, "New principal joined");

        self.authorized(&user, &session, role, refresh)
    }

    /// Verifies a credential and opens a new session under the given role.
    pub async fn login(
        &self,
        role: Role,
        email: &str,
        password: &str,
        client: &ClientContext,
    ) -> Result<Authorized, AppError> {
        let email = normalize_email(email)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        let password_valid = self.hasher.verify_password(password, &user.password_hash)?;
        if !password_valid {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let grant = self.grants.find_live(user.id, role).await?;
        gate::evaluate(&user, grant.as_ref(), role, Utc::now())?;

        let mut tx = self.pool.begin().await?;
        let (session, refresh) = self.open_session_tx(&mut tx, user.id, client).await?;
        tx.commit().await?;

        info!(user_id = %user.id, session_id = %session.id, role = %role, "Login successful");

        self.authorized(&user, &session, role, refresh)
    }

    /// Lists active sessions for a principal, oldest-issued first.
    pub async fn find_active_sessions(&self, user_id: Uuid) -> Result<Vec<Session>, AppError> {
        self.sessions.find_active_by_user(user_id).await
    }

    /// Revokes one session and its refresh tokens.
    ///
    /// Idempotent: revoking an already-revoked or unknown session is a no-op
    /// success, so revocation is always safe to retry.
    pub async fn revoke(
        &self,
        session_id: Uuid,
        revoked_by: Option<Uuid>,
        reason: &str,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;
        let transitioned = self.sessions.revoke_tx(&mut tx, session_id, reason).await?;
        if transitioned {
            self.revocations
                .upsert_tx(&mut tx, session_id, revoked_by, reason)
                .await?;
            self.tokens
                .revoke_by_sessions_tx(&mut tx, &[session_id])
                .await?;
        }
        tx.commit().await?;

        if transitioned {
            info!(session_id = %session_id, reason = %reason, "Session revoked");
        }
        Ok(())
    }

    /// Revokes every other active session for a principal.
    ///
    /// The active-session list is snapshotted once; a session created after
    /// the snapshot survives the call. That race is accepted — each row
    /// update is individually atomic, the set is not.
    ///
    /// When `revoke_current` is false, exactly one session is kept: the
    /// `current` id when supplied and still active, otherwise the
    /// oldest-issued one. Zero other sessions is a success, not an error.
    pub async fn revoke_others(
        &self,
        user_id: Uuid,
        current: Option<Uuid>,
        revoke_current: bool,
        reason: &str,
    ) -> Result<RevokeOthersOutcome, AppError> {
        let active = self.sessions.find_active_by_user(user_id).await?;
        let kept = if revoke_current {
            None
        } else {
            select_kept_session(&active, current)
        };

        let targets: Vec<Uuid> = active
            .iter()
            .map(|s| s.id)
            .filter(|id| Some(*id) != kept)
            .collect();

        if targets.is_empty() {
            return Ok(RevokeOthersOutcome::default());
        }

        let mut tx = self.pool.begin().await?;
        let mut revoked_ids = Vec::with_capacity(targets.len());
        for session_id in &targets {
            if self.sessions.revoke_tx(&mut tx, *session_id, reason).await? {
                self.revocations
                    .upsert_tx(&mut tx, *session_id, Some(user_id), reason)
                    .await?;
                revoked_ids.push(*session_id);
            }
        }
        self.tokens
            .revoke_by_sessions_tx(&mut tx, &revoked_ids)
            .await?;
        tx.commit().await?;

        info!(
            user_id = %user_id,
            revoked = revoked_ids.len(),
            kept = ?kept,
            "Revoked other sessions"
        );

        Ok(RevokeOthersOutcome {
            revoked_count: revoked_ids.len(),
            revoked_ids,
        })
    }

    /// Inserts a session and its root refresh token inside the caller's
    /// transaction, returning the session and the raw refresh secret.
    async fn open_session_tx(
        &self,
        conn: &mut sqlx::PgConnection,
        user_id: Uuid,
        client: &ClientContext,
    ) -> Result<(Session, String), AppError> {
        let expires_at = Utc::now() + chrono::Duration::hours(self.config.refresh_ttl_hours as i64);
        let session = self
            .sessions
            .create_tx(conn, user_id, expires_at, client)
            .await?;

        let refresh = secret::generate();
        self.tokens
            .create_tx(
                conn,
                session.id,
                None,
                &secret::digest(&refresh),
                session.expires_at,
            )
            .await?;

        Ok((session, refresh))
    }

    /// Builds the authorized response for a principal and fresh session.
    fn authorized(
        &self,
        user: &User,
        session: &Session,
        role: Role,
        refresh: String,
    ) -> Result<Authorized, AppError> {
        let (access, expired_at) = self.encoder.issue_access_token(user.id, session.id, role)?;
        Ok(Authorized {
            id: user.id,
            token: IssuedTokens {
                access,
                refresh,
                expired_at,
                refreshable_until: session.expires_at,
            },
        })
    }
}

/// Lowercases and trims an email, rejecting obviously malformed input.
fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("Invalid email address"));
    }
    Ok(email)
}
