//! Password reset request repository.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use todohub_core::error::{AppError, ErrorKind};
use todohub_core::result::AppResult;
use todohub_entity::reset::PasswordResetRequest;

/// Repository for password reset request rows.
#[derive(Debug, Clone)]
pub struct PasswordResetRepository {
    pool: PgPool,
}

impl PasswordResetRepository {
    /// Create a new password reset repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a reset request. `user_id` stays NULL for unknown emails.
    pub async fn create(
        &self,
        user_id: Option<Uuid>,
        email: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<PasswordResetRequest> {
        sqlx::query_as::<_, PasswordResetRequest>(
            "INSERT INTO password_reset_requests (user_id, email, token_hash, expires_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(user_id)
        .bind(email)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create reset request", e)
        })
    }

    /// Look up a reset request by token digest.
    pub async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<PasswordResetRequest>> {
        sqlx::query_as::<_, PasswordResetRequest>(
            "SELECT * FROM password_reset_requests WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find reset request", e)
        })
    }

    /// Consume a request inside the caller's transaction.
    ///
    /// The `consumed_at IS NULL` predicate makes consumption single-use:
    /// the losing side of a concurrent confirm sees `false`.
    pub async fn consume_tx(&self, conn: &mut PgConnection, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE password_reset_requests SET consumed_at = NOW() \
             WHERE id = $1 AND consumed_at IS NULL AND expires_at > NOW()",
        )
        .bind(id)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to consume reset request", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump the failed confirmation counter.
    pub async fn record_failure(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(
            "UPDATE password_reset_requests SET failure_count = failure_count + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record reset failure", e)
        })?;
        Ok(())
    }
}
