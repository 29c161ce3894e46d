//! Role grant entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::Role;

/// A role granted to a principal.
///
/// Grants carry their own lifecycle independent of the owning principal's
/// soft-delete: a grant row is *live* only when neither `revoked_at` nor
/// `deleted_at` is set. Whether the grant actually authorizes anything also
/// depends on the owning principal's state; that combined check belongs to
/// the authorization gate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleGrant {
    /// Unique grant identifier.
    pub id: Uuid,
    /// Owning principal.
    pub user_id: Uuid,
    /// Granted role.
    pub role: Role,
    /// When the role was granted.
    pub granted_at: DateTime<Utc>,
    /// When the role was revoked, if ever.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl RoleGrant {
    /// Check whether the grant row itself is live (ignores principal state).
    pub fn is_live_row(&self) -> bool {
        self.revoked_at.is_none() && self.deleted_at.is_none()
    }
}
