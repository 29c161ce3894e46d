//! Session handlers — list, revoke one, revoke others.

use axum::Json;
use axum::extract::State;

use crate::dto::request::{RevokeOthersRequest, RevokeSessionRequest};
use crate::dto::response::{
    ApiResponse, MessageResponse, RevokeOthersResponse, SessionResponse,
};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/auth/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<SessionResponse>>>, ApiError> {
    let sessions = state
        .session_manager
        .find_active_sessions(auth.user_id)
        .await?;

    let items = sessions
        .iter()
        .map(|s| SessionResponse::from_session(s, auth.session_id))
        .collect();

    Ok(Json(ApiResponse::ok(items)))
}

/// POST /api/auth/sessions/revoke
///
/// Revokes every other active session for the caller; with
/// `revoke_current: true` the calling session goes too.
pub async fn revoke_others(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RevokeOthersRequest>,
) -> Result<Json<ApiResponse<RevokeOthersResponse>>, ApiError> {
    let outcome = state
        .session_manager
        .revoke_others(
            auth.user_id,
            Some(auth.session_id),
            req.revoke_current,
            "user_revoked_others",
        )
        .await?;

    Ok(Json(ApiResponse::ok(RevokeOthersResponse {
        revoked_count: outcome.revoked_count,
        revoked_ids: outcome.revoked_ids,
    })))
}

/// POST /api/auth/sessions/revoke-one
///
/// Revokes one of the caller's own sessions by id. Idempotent; revoking a
/// session that is already gone still succeeds.
pub async fn revoke_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RevokeSessionRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    // Only the caller's own sessions are in scope; an id belonging to
    // someone else is treated the same as an unknown one.
    let owned = state
        .session_manager
        .find_active_sessions(auth.user_id)
        .await?
        .iter()
        .any(|s| s.id == req.session_id);

    if owned {
        state
            .session_manager
            .revoke(req.session_id, Some(auth.user_id), "user_revoked")
            .await?;
    }

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Session revoked".to_string(),
    })))
}
