//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use todohub_entity::session::model::Session;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Token pair returned by join, login, and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,
    /// Opaque refresh secret.
    pub refresh_token: String,
    /// Access token expiration.
    pub expired_at: DateTime<Utc>,
    /// End of the refresh window.
    pub refreshable_until: DateTime<Utc>,
}

/// Authenticated principal plus tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedResponse {
    /// Principal ID.
    pub user_id: Uuid,
    /// Issued token pair.
    pub tokens: TokenResponse,
}

/// Principal summary for `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    /// Principal ID.
    pub user_id: Uuid,
    /// Email address.
    pub email: String,
    /// Role the current token was authorized under.
    pub role: String,
    /// The session this token belongs to.
    pub session_id: Uuid,
}

/// Session summary for the session list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Session ID.
    pub id: Uuid,
    /// When the session was opened.
    pub issued_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
    /// Client IP at open time.
    pub ip_address: Option<String>,
    /// Client user agent at open time.
    pub user_agent: Option<String>,
    /// Whether this is the session the caller authenticated with.
    pub current: bool,
}

impl SessionResponse {
    /// Builds a summary from a session row.
    pub fn from_session(session: &Session, current_session_id: Uuid) -> Self {
        Self {
            id: session.id,
            issued_at: session.issued_at,
            expires_at: session.expires_at,
            ip_address: session.ip_address.clone(),
            user_agent: session.user_agent.clone(),
            current: session.id == current_session_id,
        }
    }
}

/// Result of a revoke-others call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeOthersResponse {
    /// Number of sessions revoked.
    pub revoked_count: usize,
    /// IDs of the revoked sessions.
    pub revoked_ids: Vec<Uuid>,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Database connectivity.
    pub database: String,
}
