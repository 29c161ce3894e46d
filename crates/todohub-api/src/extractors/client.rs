//! `ClientInfo` extractor — captures client metadata for session records.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use todohub_entity::session::model::ClientContext;

/// Client IP and user agent, taken from request headers.
///
/// Infallible: absent headers simply produce `None` fields.
#[derive(Debug, Clone)]
pub struct ClientInfo(pub ClientContext);

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // First hop of x-forwarded-for is the originating client when the
        // server sits behind a proxy.
        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string());

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(ClientInfo(ClientContext {
            ip_address,
            user_agent,
        }))
    }
}
