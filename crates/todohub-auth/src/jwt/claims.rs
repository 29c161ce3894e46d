//! JWT claims structure embedded in access tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use todohub_entity::user::Role;

/// Claims payload carried by every access token.
///
/// The token proves who the caller claimed to be at issuance time, nothing
/// more: the authorization gate re-validates the role grant against the
/// database on every protected call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the principal ID.
    pub sub: Uuid,
    /// Session this token belongs to.
    pub sid: Uuid,
    /// Role tag at the time of issuance.
    pub role: Role,
    /// Fixed issuer claim.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token ID.
    pub jti: Uuid,
}

impl Claims {
    /// Returns the principal ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the session ID.
    pub fn session_id(&self) -> Uuid {
        self.sid
    }
}
