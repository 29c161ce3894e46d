//! Password reset request entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single-use, time-boxed password reset request.
///
/// `user_id` is nullable: requests for unknown emails are stored too, so the
/// request path does identical work whether or not the account exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PasswordResetRequest {
    /// Unique request identifier.
    pub id: Uuid,
    /// Resolved principal, if the email matched one.
    pub user_id: Option<Uuid>,
    /// The email the reset was requested for.
    pub email: String,
    /// SHA-256 hex digest of the opaque reset token.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// When the reset was requested.
    pub requested_at: DateTime<Utc>,
    /// Short expiry, typically one hour after the request.
    pub expires_at: DateTime<Utc>,
    /// Set once the token is exchanged; never cleared.
    pub consumed_at: Option<DateTime<Utc>>,
    /// Failed confirmation attempts against this request.
    pub failure_count: i32,
}

impl PasswordResetRequest {
    /// Check whether the request can still be consumed at the given instant.
    pub fn is_consumable(&self, now: DateTime<Utc>) -> bool {
        self.consumed_at.is_none() && self.expires_at > now
    }
}
