//! Session revocation audit record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Audit row keyed 1:1 by session, written whenever a session transitions
/// to revoked. Upserted, so repeated revocations of the same session do not
/// duplicate the record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionRevocation {
    /// The revoked session.
    pub session_id: Uuid,
    /// When the revocation happened.
    pub revoked_at: DateTime<Utc>,
    /// Who triggered the revocation (None for system-initiated).
    pub revoked_by: Option<Uuid>,
    /// Machine-readable reason ("logout", "password_reset", ...).
    pub reason: String,
}
