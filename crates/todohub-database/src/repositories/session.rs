//! Session repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use todohub_core::error::{AppError, ErrorKind};
use todohub_core::result::AppResult;
use todohub_entity::session::model::{ClientContext, Session};

/// Repository for session rows.
///
/// Sessions are soft-delete only; revocation flips `revoked_at` in place and
/// the row remains queryable for the audit trail.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new active session inside the caller's transaction.
    pub async fn create_tx(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
        client: &ClientContext,
    ) -> AppResult<Session> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, expires_at, ip_address, user_agent) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(user_id)
        .bind(expires_at)
        .bind(&client.ip_address)
        .bind(&client.user_agent)
        .fetch_one(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Find a non-deleted session by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// List active sessions for a principal, oldest-issued first.
    ///
    /// The ascending order is load-bearing: callers use "oldest" as the
    /// stable proxy for the current session when none is supplied.
    pub async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions \
             WHERE user_id = $1 AND revoked_at IS NULL AND deleted_at IS NULL \
               AND expires_at > NOW() \
             ORDER BY issued_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find active sessions", e)
        })
    }

    /// Revoke a session inside the caller's transaction.
    ///
    /// Returns whether a row actually transitioned. Zero rows means the
    /// session is absent or already revoked; callers treat that as a no-op
    /// success so revocation is always safe to retry.
    pub async fn revoke_tx(
        &self,
        conn: &mut PgConnection,
        session_id: Uuid,
        reason: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE sessions SET revoked_at = NOW(), revoked_reason = $2, updated_at = NOW() \
             WHERE id = $1 AND revoked_at IS NULL AND deleted_at IS NULL",
        )
        .bind(session_id)
        .bind(reason)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke session", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every active session for a principal inside the caller's
    /// transaction, returning the IDs that transitioned.
    pub async fn revoke_all_for_user_tx(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        reason: &str,
    ) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "UPDATE sessions SET revoked_at = NOW(), revoked_reason = $2, updated_at = NOW() \
             WHERE user_id = $1 AND revoked_at IS NULL AND deleted_at IS NULL \
               AND expires_at > NOW() \
             RETURNING id",
        )
        .bind(user_id)
        .bind(reason)
        .fetch_all(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke user sessions", e)
        })
    }

    /// Touch the session's `updated_at` inside the caller's transaction.
    pub async fn touch_tx(&self, conn: &mut PgConnection, session_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET updated_at = NOW() WHERE id = $1")
            .bind(session_id)
            .execute(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to touch session", e)
            })?;
        Ok(())
    }
}
