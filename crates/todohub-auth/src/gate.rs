//! Per-request authorization with live role-grant rechecks.
//!
//! The JWT is never trusted as sufficient proof of current privilege: every
//! protected call re-fetches the grant, principal, and session rows so that
//! role or session revocation takes effect immediately instead of at next
//! token expiry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use todohub_core::error::AppError;
use todohub_database::repositories::grant::RoleGrantRepository;
use todohub_database::repositories::session::SessionRepository;
use todohub_database::repositories::user::UserRepository;
use todohub_entity::user::grant::RoleGrant;
use todohub_entity::user::model::User;
use todohub_entity::user::role::Role;

use crate::jwt::JwtDecoder;

/// Authenticated caller context produced by a successful gate pass.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The authenticated principal.
    pub user_id: Uuid,
    /// The session the presented token belongs to.
    pub session_id: Uuid,
    /// The role the caller was authorized under.
    pub role: Role,
    /// Principal email, for handlers that echo it back.
    pub email: String,
}

/// Decides whether a fetched (principal, grant) pair authorizes the role.
///
/// Pure over its inputs so the decision matrix is testable without a
/// database. Matches the role exhaustively: extending [`Role`] forces this
/// function to be revisited.
pub fn evaluate(
    user: &User,
    grant: Option<&RoleGrant>,
    role: Role,
    _now: DateTime<Utc>,
) -> Result<(), AppError> {
    match role {
        Role::GuestVisitor => {
            // Guests never hold a grant that passes the gate.
            return Err(AppError::forbidden("Guest visitors cannot be authorized"));
        }
        Role::TodoUser | Role::SystemAdmin | Role::Admin => {}
    }

    let grant = grant.ok_or_else(|| AppError::forbidden("Role grant not found or revoked"))?;
    if grant.role != role || grant.user_id != user.id || !grant.is_live_row() {
        return Err(AppError::forbidden("Role grant not found or revoked"));
    }

    if user.is_deleted() {
        return Err(AppError::forbidden("Account no longer exists"));
    }
    if !user.status.can_authenticate() {
        return Err(AppError::forbidden("Account is suspended"));
    }
    if role.is_elevated() && !user.email_verified {
        return Err(AppError::forbidden("Email verification required"));
    }

    Ok(())
}

/// The authorization gate run before any protected handler logic.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    /// Access token validator.
    decoder: Arc<JwtDecoder>,
    /// Principal lookups.
    users: Arc<UserRepository>,
    /// Live grant lookups.
    grants: Arc<RoleGrantRepository>,
    /// Session lookups.
    sessions: Arc<SessionRepository>,
}

impl AuthorizationGate {
    /// Creates a new gate with all required dependencies.
    pub fn new(
        decoder: Arc<JwtDecoder>,
        users: Arc<UserRepository>,
        grants: Arc<RoleGrantRepository>,
        sessions: Arc<SessionRepository>,
    ) -> Self {
        Self {
            decoder,
            users,
            grants,
            sessions,
        }
    }

    /// Authorizes a bearer token.
    ///
    /// A structurally invalid or expired token, or a revoked/expired session,
    /// is `Unauthorized`; a live token whose principal lacks the claimed role
    /// or state is `Forbidden`.
    pub async fn authorize(&self, token: &str) -> Result<AuthContext, AppError> {
        let claims = self.decoder.decode(token)?;
        let now = Utc::now();

        let user = self
            .users
            .find_by_id(claims.user_id())
            .await?
            .ok_or_else(|| AppError::forbidden("Account no longer exists"))?;

        let grant = self.grants.find_live(user.id, claims.role).await?;
        evaluate(&user, grant.as_ref(), claims.role, now)?;

        let session = self
            .sessions
            .find_by_id(claims.session_id())
            .await?
            .ok_or_else(|| AppError::unauthorized("Session is no longer valid"))?;
        if !session.is_active(now) {
            return Err(AppError::unauthorized("Session is no longer valid"));
        }

        Ok(AuthContext {
            user_id: user.id,
            session_id: session.id,
            role: claims.role,
            email: user.email,
        })
    }
}
