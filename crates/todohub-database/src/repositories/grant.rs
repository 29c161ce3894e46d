//! Role grant repository implementation.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use todohub_core::error::{AppError, ErrorKind};
use todohub_core::result::AppResult;
use todohub_entity::user::grant::RoleGrant;
use todohub_entity::user::role::Role;

/// Repository for role grant rows.
#[derive(Debug, Clone)]
pub struct RoleGrantRepository {
    pool: PgPool,
}

impl RoleGrantRepository {
    /// Create a new role grant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a grant inside the caller's transaction.
    pub async fn create_tx(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        role: Role,
    ) -> AppResult<RoleGrant> {
        sqlx::query_as::<_, RoleGrant>(
            "INSERT INTO role_grants (user_id, role) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(conn)
        .await
        .map_err(AppError::from)
    }

    /// Find the live grant for a (principal, role) pair.
    ///
    /// Only the grant row's own lifecycle is checked here; principal-level
    /// conditions belong to the authorization gate.
    pub async fn find_live(&self, user_id: Uuid, role: Role) -> AppResult<Option<RoleGrant>> {
        sqlx::query_as::<_, RoleGrant>(
            "SELECT * FROM role_grants \
             WHERE user_id = $1 AND role = $2 AND revoked_at IS NULL AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find role grant", e))
    }

    /// Revoke the live grant for a (principal, role) pair.
    ///
    /// Returns whether a row actually transitioned; revoking an absent or
    /// already-revoked grant is a no-op.
    pub async fn revoke(&self, user_id: Uuid, role: Role) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE role_grants SET revoked_at = NOW() \
             WHERE user_id = $1 AND role = $2 AND revoked_at IS NULL AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke role grant", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
