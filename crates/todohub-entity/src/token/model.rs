//! Refresh token entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single-use refresh credential chained to exactly one session.
///
/// Tokens form a rotation chain: the root token created at login has
/// `parent_id = None`; every successful refresh marks the presented token
/// rotated and inserts a child pointing back at it. Rotated rows are kept —
/// re-presenting a rotated secret is how replay is detected.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Unique token identifier.
    pub id: Uuid,
    /// Owning session.
    pub session_id: Uuid,
    /// The token this one was rotated from, if any.
    pub parent_id: Option<Uuid>,
    /// SHA-256 hex digest of the opaque secret. The raw secret is never stored.
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// When the token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// Set the instant the token is exchanged for a child.
    pub rotated_at: Option<DateTime<Utc>>,
    /// Set on explicit revocation (logout, password reset, revoke-others).
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a refresh token, detected lazily at use time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// Usable, pending session and grant checks.
    Active,
    /// Already exchanged for a child; terminal.
    Rotated,
    /// Explicitly killed; terminal.
    Revoked,
    /// Past its expiry; terminal.
    Expired,
}

impl RefreshToken {
    /// Classify the token's state at the given instant.
    ///
    /// Revocation wins over rotation so that a bulk-revoked chain reports
    /// `Revoked` even for the already-rotated ancestors.
    pub fn state(&self, now: DateTime<Utc>) -> TokenState {
        if self.revoked_at.is_some() {
            TokenState::Revoked
        } else if self.rotated_at.is_some() {
            TokenState::Rotated
        } else if self.expires_at <= now {
            TokenState::Expired
        } else {
            TokenState::Active
        }
    }

    /// Check whether the token itself is exchangeable (session checks aside).
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.state(now) == TokenState::Active
    }
}
