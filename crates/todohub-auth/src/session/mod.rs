//! Session lifecycle: login, join, revocation, and refresh token rotation.

pub mod manager;
pub mod refresh;

pub use manager::{Authorized, IssuedTokens, RevokeOthersOutcome, SessionManager};
pub use refresh::{RefreshChain, RefreshedTokens};
