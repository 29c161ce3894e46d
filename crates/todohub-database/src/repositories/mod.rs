//! Concrete repository implementations.
//!
//! Each repository owns a clone of the shared `PgPool` for standalone
//! operations. Operations that participate in a multi-statement transaction
//! are suffixed `_tx` and take `&mut PgConnection` instead, so the caller
//! controls commit and rollback.

pub mod grant;
pub mod password_reset;
pub mod refresh_token;
pub mod revocation;
pub mod session;
pub mod user;

pub use grant::RoleGrantRepository;
pub use password_reset::PasswordResetRepository;
pub use refresh_token::RefreshTokenRepository;
pub use revocation::SessionRevocationRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
