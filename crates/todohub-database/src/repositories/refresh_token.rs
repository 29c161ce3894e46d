//! Refresh token repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use todohub_core::error::{AppError, ErrorKind};
use todohub_core::result::AppResult;
use todohub_entity::token::model::RefreshToken;

/// Repository for refresh token rows.
#[derive(Debug, Clone)]
pub struct RefreshTokenRepository {
    pool: PgPool,
}

impl RefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a token inside the caller's transaction.
    ///
    /// `parent_id = None` marks the chain root created at login; children
    /// carry the ID of the token they were rotated from.
    pub async fn create_tx(
        &self,
        conn: &mut PgConnection,
        session_id: Uuid,
        parent_id: Option<Uuid>,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (session_id, parent_id, token_hash, expires_at) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(session_id)
        .bind(parent_id)
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create refresh token", e)
        })
    }

    /// Look up a token by the digest of its opaque secret.
    ///
    /// Rotated and revoked rows are returned too; the caller distinguishes
    /// their states. That is what makes replay of a rotated secret
    /// detectable rather than indistinguishable from a bad secret.
    pub async fn find_by_hash(&self, token_hash: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
            })
    }

    /// Atomically claim a token for rotation inside the caller's transaction.
    ///
    /// The `WHERE rotated_at IS NULL AND revoked_at IS NULL` predicate is the
    /// row-level check-and-set that settles concurrent rotations: exactly one
    /// caller observes `rows_affected == 1`, every other caller gets `false`
    /// and must not create a child.
    pub async fn mark_rotated_tx(
        &self,
        conn: &mut PgConnection,
        token_id: Uuid,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET rotated_at = NOW() \
             WHERE id = $1 AND rotated_at IS NULL AND revoked_at IS NULL",
        )
        .bind(token_id)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to rotate refresh token", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every unrevoked token belonging to the given sessions, inside
    /// the caller's transaction.
    pub async fn revoke_by_sessions_tx(
        &self,
        conn: &mut PgConnection,
        session_ids: &[Uuid],
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() \
             WHERE session_id = ANY($1) AND revoked_at IS NULL",
        )
        .bind(session_ids)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke refresh tokens", e)
        })?;
        Ok(result.rows_affected())
    }
}
