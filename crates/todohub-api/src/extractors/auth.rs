//! `AuthUser` extractor — pulls the bearer token from the Authorization
//! header and runs it through the authorization gate.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use todohub_auth::gate::AuthContext;
use todohub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated caller context available in handlers.
///
/// Extraction runs the full gate pass: signature and expiry on the token,
/// then live principal, grant, and session checks against the database.
#[derive(Debug, Clone)]
pub struct AuthUser(pub AuthContext);

impl std::ops::Deref for AuthUser {
    type Target = AuthContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        let ctx = state.gate.authorize(token).await?;
        Ok(AuthUser(ctx))
    }
}
