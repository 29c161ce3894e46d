//! Auth handlers — join, login, refresh, password reset, logout, me.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use todohub_auth::reset::ResetAck;
use todohub_core::error::AppError;
use todohub_entity::user::Role;

use crate::dto::request::{
    JoinRequest, LoginRequest, RefreshRequest, ResetConfirmBody, ResetRequestBody,
};
use crate::dto::response::{
    ApiResponse, AuthorizedResponse, MeResponse, MessageResponse, TokenResponse,
};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ClientInfo};
use crate::state::AppState;

/// POST /api/auth/{role}/join
pub async fn join(
    State(state): State<AppState>,
    Path(role): Path<String>,
    ClientInfo(client): ClientInfo,
    Json(req): Json<JoinRequest>,
) -> Result<Json<ApiResponse<AuthorizedResponse>>, ApiError> {
    let role: Role = role.parse()?;
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let result = state
        .session_manager
        .join(role, &req.email, &req.password, &client)
        .await?;

    Ok(Json(ApiResponse::ok(AuthorizedResponse {
        user_id: result.id,
        tokens: TokenResponse {
            access_token: result.token.access,
            refresh_token: result.token.refresh,
            expired_at: result.token.expired_at,
            refreshable_until: result.token.refreshable_until,
        },
    })))
}

/// POST /api/auth/{role}/login
pub async fn login(
    State(state): State<AppState>,
    Path(role): Path<String>,
    ClientInfo(client): ClientInfo,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthorizedResponse>>, ApiError> {
    let role: Role = role.parse()?;
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let result = state
        .session_manager
        .login(role, &req.email, &req.password, &client)
        .await?;

    Ok(Json(ApiResponse::ok(AuthorizedResponse {
        user_id: result.id,
        tokens: TokenResponse {
            access_token: result.token.access,
            refresh_token: result.token.refresh,
            expired_at: result.token.expired_at,
            refreshable_until: result.token.refreshable_until,
        },
    })))
}

/// POST /api/auth/{role}/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthorizedResponse>>, ApiError> {
    let role: Role = role.parse()?;

    let result = state.refresh_chain.refresh(role, &req.refresh_token).await?;

    Ok(Json(ApiResponse::ok(AuthorizedResponse {
        user_id: result.user_id,
        tokens: TokenResponse {
            access_token: result.access,
            refresh_token: result.refresh,
            expired_at: result.expired_at,
            refreshable_until: result.refreshable_until,
        },
    })))
}

/// POST /api/auth/{role}/password/reset/request
pub async fn reset_request(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(req): Json<ResetRequestBody>,
) -> Result<Json<ApiResponse<ResetAck>>, ApiError> {
    // The role segment is validated but the reset flow is account-wide.
    let _role: Role = role.parse()?;
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let ack = state.reset_flow.request_reset(&req.email).await?;
    Ok(Json(ApiResponse::ok(ack)))
}

/// POST /api/auth/{role}/password/reset/confirm
pub async fn reset_confirm(
    State(state): State<AppState>,
    Path(role): Path<String>,
    Json(req): Json<ResetConfirmBody>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let _role: Role = role.parse()?;
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    state
        .reset_flow
        .confirm_reset(&req.token, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Password has been reset".to_string(),
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state
        .session_manager
        .revoke(auth.session_id, Some(auth.user_id), "logout")
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<MeResponse>> {
    Json(ApiResponse::ok(MeResponse {
        user_id: auth.user_id,
        email: auth.email.clone(),
        role: auth.role.to_string(),
        session_id: auth.session_id,
    }))
}
