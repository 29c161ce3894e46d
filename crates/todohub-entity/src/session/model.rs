//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One authenticated client context.
///
/// Sessions are created at login and only ever mutated (revoked), never
/// hard-deleted. A revoked row stays around as evidence for the revocation
/// audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// Owning principal.
    pub user_id: Uuid,
    /// When the session was issued.
    pub issued_at: DateTime<Utc>,
    /// When the session stops accepting refreshes.
    pub expires_at: DateTime<Utc>,
    /// When the session was revoked, if ever.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Why the session was revoked.
    pub revoked_reason: Option<String>,
    /// Client IP at login.
    pub ip_address: Option<String>,
    /// Client user agent at login.
    pub user_agent: Option<String>,
    /// Last mutation timestamp (touched on every refresh).
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session is active at the given instant.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.deleted_at.is_none() && self.expires_at > now
    }
}

/// Client metadata captured when a session is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientContext {
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client user agent string.
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(revoked: bool, expired: bool) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            issued_at: now - Duration::hours(1),
            expires_at: if expired {
                now - Duration::minutes(1)
            } else {
                now + Duration::hours(1)
            },
            revoked_at: revoked.then_some(now),
            revoked_reason: revoked.then(|| "test".to_string()),
            ip_address: None,
            user_agent: None,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn test_is_active() {
        let now = Utc::now();
        assert!(session(false, false).is_active(now));
        assert!(!session(true, false).is_active(now));
        assert!(!session(false, true).is_active(now));
    }
}
