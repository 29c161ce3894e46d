//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Join (self-registration) request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinRequest {
    /// Email address used as the login name.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Opaque refresh secret.
    pub refresh_token: String,
}

/// Password reset request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetRequestBody {
    /// Email address the reset is for.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

/// Password reset confirmation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetConfirmBody {
    /// Opaque reset secret from the out-of-band message.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// Replacement password.
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Revoke-other-sessions request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevokeOthersRequest {
    /// When true, the calling session is revoked too.
    #[serde(default)]
    pub revoke_current: bool,
}

/// Single-session revocation request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevokeSessionRequest {
    /// The session to revoke.
    pub session_id: Uuid,
}
