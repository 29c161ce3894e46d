//! Principal (user) entities: account model, status, roles, and role grants.

pub mod grant;
pub mod model;
pub mod role;
pub mod status;

pub use grant::RoleGrant;
pub use model::{CreateUser, User};
pub use role::Role;
pub use status::UserStatus;
