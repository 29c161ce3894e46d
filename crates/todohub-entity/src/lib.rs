//! # todohub-entity
//!
//! Domain entity models for the TodoHub credential and session subsystem:
//! principals, role grants, sessions, refresh tokens, session revocation
//! records, and password reset requests.

pub mod reset;
pub mod revocation;
pub mod session;
pub mod token;
pub mod user;

pub use reset::PasswordResetRequest;
pub use revocation::SessionRevocation;
pub use session::Session;
pub use token::RefreshToken;
pub use user::{Role, RoleGrant, User, UserStatus};
