//! Single-use, time-boxed password reset flow.
//!
//! The request path must not reveal whether an email belongs to an account:
//! the acknowledgment shape, the stored row, and the work performed are the
//! same on both paths. The raw token leaves the system only through the
//! out-of-band delivery hook, never through the API response.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, info};

use todohub_core::config::auth::AuthConfig;
use todohub_core::error::AppError;
use todohub_database::repositories::password_reset::PasswordResetRepository;
use todohub_database::repositories::refresh_token::RefreshTokenRepository;
use todohub_database::repositories::revocation::SessionRevocationRepository;
use todohub_database::repositories::session::SessionRepository;
use todohub_database::repositories::user::UserRepository;

use crate::password::{PasswordHasher, PasswordValidator};
use crate::secret;

/// Uniform acknowledgment returned for every reset request.
///
/// Identical shape whether or not the email matched a principal; no
/// token-like field ever appears here.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResetAck {
    /// The email the reset was requested for, echoed back.
    pub email: String,
    /// When the request was accepted.
    pub requested_at: DateTime<Utc>,
    /// When the reset token stops working.
    pub expires_at: DateTime<Utc>,
}

/// Issues and consumes password reset tokens.
#[derive(Debug, Clone)]
pub struct PasswordResetFlow {
    /// Shared connection pool, used for the confirm transaction.
    pool: PgPool,
    /// Principal repository.
    users: Arc<UserRepository>,
    /// Reset request repository.
    resets: Arc<PasswordResetRepository>,
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
    /// Auth configuration.
    config: AuthConfig,
}

impl PasswordResetFlow {
    /// Creates a new reset flow with all required dependencies.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        users: Arc<UserRepository>,
        resets: Arc<PasswordResetRepository>,
        sessions: Arc<SessionRepository>,
        tokens: Arc<RefreshTokenRepository>,
        revocations: Arc<SessionRevocationRepository>,
        hasher: Arc<PasswordHasher>,
        validator: Arc<PasswordValidator>,
        config: AuthConfig,
    ) -> Self {
        Self {
            pool,
            users,
            resets,
            sessions,
            tokens,
            revocations,
            hasher,
            validator,
            config,
        }
    }

    /// Accepts a reset request for an email that may or may not exist.
    ///
    /// Both paths resolve the principal, generate a secret, digest it, and
    /// store a row — there is no early return that would make the unknown
    /// case observably cheaper or shaped differently.
    pub async fn request_reset(&self, email: &str) -> Result<ResetAck, AppError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("Invalid email address"));
        }

        let user = self.users.find_by_email(&email).await?;
        let token = secret::generate();
        let expires_at =
            Utc::now() + chrono::Duration::minutes(self.config.reset_ttl_minutes as i64);

        let request = self
            .resets
            .create(
                user.as_ref().map(|u| u.id),
                &email,
                &secret::digest(&token),
                expires_at,
            )
            .await?;

        // Out-of-band delivery hook. Mail transport is out of scope; the
        // token is only traced at debug level for operator-driven delivery.
        debug!(request_id = %request.id, token = %token, "Reset token issued for delivery");
        info!(request_id = %request.id, "Password reset requested");

        Ok(ResetAck {
            email: request.email,
            requested_at: request.requested_at,
            expires_at: request.expires_at,
        })
    }

    /// Consumes a reset token and rotates the credential.
    ///
    /// The credential update, token consumption, and mass session
    /// revocation commit in one transaction: a crash can never leave old
    /// sessions valid against the new password.
    pub async fn confirm_reset(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let request = self
            .resets
            .find_by_hash(&secret::digest(token))
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired reset token"))?;

        let now = Utc::now();
        if !request.is_consumable(now) {
            if let Err(e) = self.resets.record_failure(request.id).await {
                debug!(request_id = %request.id, error = %e, "Failed to record reset failure");
            }
            return Err(AppError::unauthorized("Invalid or expired reset token"));
        }

        // Requests for unknown emails are stored but can never be confirmed.
        let Some(user_id) = request.user_id else {
            if let Err(e) = self.resets.record_failure(request.id).await {
                debug!(request_id = %request.id, error = %e, "Failed to record reset failure");
            }
            return Err(AppError::unauthorized("Invalid or expired reset token"));
        };

        self.validator.validate(new_password)?;
        let password_hash = self.hasher.hash_password(new_password)?;

        let mut tx = self.pool.begin().await?;

        let consumed = self.resets.consume_tx(&mut tx, request.id).await?;
        if !consumed {
            // Lost a concurrent confirm of the same token.
            return Err(AppError::unauthorized("Invalid or expired reset token"));
        }

        self.users
            .update_password_tx(&mut tx, user_id, &password_hash)
            .await?;

        let revoked = self
            .sessions
            .revoke_all_for_user_tx(&mut tx, user_id, "password_reset")
            .await?;
        self.tokens.revoke_by_sessions_tx(&mut tx, &revoked).await?;
        for session_id in &revoked {
            self.revocations
                .upsert_tx(&mut tx, *session_id, Some(user_id), "password_reset")
                .await?;
        }

        tx.commit().await?;

        info!(
            user_id = %user_id,
            revoked_sessions = revoked.len(),
            "Password reset confirmed; active sessions revoked"
        );
        Ok(())
    }
}
