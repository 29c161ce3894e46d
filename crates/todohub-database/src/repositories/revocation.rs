//! Session revocation record repository.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use todohub_core::error::{AppError, ErrorKind};
use todohub_core::result::AppResult;
use todohub_entity::revocation::SessionRevocation;

/// Repository for the 1:1 session revocation audit rows.
#[derive(Debug, Clone)]
pub struct SessionRevocationRepository {
    pool: PgPool,
}

impl SessionRevocationRepository {
    /// Create a new session revocation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a revocation inside the caller's transaction.
    ///
    /// Keyed by session; a repeated revocation keeps the original record so
    /// the audit trail reflects the first transition.
    pub async fn upsert_tx(
        &self,
        conn: &mut PgConnection,
        session_id: Uuid,
        revoked_by: Option<Uuid>,
        reason: &str,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO session_revocations (session_id, revoked_by, reason) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (session_id) DO NOTHING",
        )
        .bind(session_id)
        .bind(revoked_by)
        .bind(reason)
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record revocation", e)
        })?;
        Ok(())
    }

    /// Fetch the revocation record for a session.
    pub async fn find_by_session(&self, session_id: Uuid) -> AppResult<Option<SessionRevocation>> {
        sqlx::query_as::<_, SessionRevocation>(
            "SELECT * FROM session_revocations WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find revocation", e))
    }
}
