//! Role enumeration for the closed role set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in TodoHub.
///
/// The set is closed: the authorization gate matches on it exhaustively,
/// so adding a role is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular todo-list owner.
    TodoUser,
    /// Operational administrator with elevated data access.
    SystemAdmin,
    /// Full platform administrator.
    Admin,
    /// Unauthenticated visitor; never holds a grant that passes the gate.
    GuestVisitor,
}

impl Role {
    /// Roles that require a verified email before the gate lets them through.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Self::SystemAdmin | Self::Admin)
    }

    /// Roles that may self-register through the join endpoint.
    ///
    /// Admin grants are provisioned out-of-band and guests have no account.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::TodoUser | Self::SystemAdmin)
    }

    /// Return the role as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TodoUser => "todo_user",
            Self::SystemAdmin => "system_admin",
            Self::Admin => "admin",
            Self::GuestVisitor => "guest_visitor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = todohub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both snake_case and the camelCase spelling used by older
        // clients ("todoUser").
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "todouser" => Ok(Self::TodoUser),
            "systemadmin" => Ok(Self::SystemAdmin),
            "admin" => Ok(Self::Admin),
            "guestvisitor" => Ok(Self::GuestVisitor),
            _ => Err(todohub_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: todo_user, system_admin, admin, guest_visitor"
            ))),
        }
    }
}
