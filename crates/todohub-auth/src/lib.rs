//! # todohub-auth
//!
//! The credential and session subsystem for TodoHub.
//!
//! ## Modules
//!
//! - `jwt` — access token creation and validation
//! - `password` — Argon2id password hashing and policy enforcement
//! - `secret` — opaque refresh/reset secret generation and digesting
//! - `session` — session lifecycle: login, join, revocation, refresh rotation
//! - `gate` — per-request authorization with live role-grant rechecks
//! - `reset` — single-use, time-boxed password reset flow

pub mod gate;
pub mod jwt;
pub mod password;
pub mod reset;
pub mod secret;
pub mod session;

pub use gate::{AuthContext, AuthorizationGate};
pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use reset::PasswordResetFlow;
pub use session::{RefreshChain, SessionManager};
