//! Roles and the route allow-list check.

use serde::{Deserialize, Serialize};

use super::AuthError;

/// A user's role. Stored on the user record as a flat string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Routes reachable by administrators only.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Routes reachable by every authenticated identity.
pub const ALL_ROLES: &[Role] = &[Role::Admin, Role::User];

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Canonicalize a stored role string.
    ///
    /// Older records carry `Administrator` and `User`; these exact spellings
    /// are accepted alongside the canonical `admin` and `user`. Matching is
    /// case-sensitive, and anything else has no role at all.
    pub fn canonicalize(raw: &str) -> Option<Role> {
        match raw {
            "admin" | "Administrator" => Some(Role::Admin),
            "user" | "User" => Some(Role::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check an authenticated identity's role against a route's allow-list.
///
/// Plain set membership on the canonical role: no hierarchy, so `admin`
/// does not imply `user`. An unrecognised role string is never allowed.
pub fn authorize(role: &str, allowed: &[Role]) -> Result<Role, AuthError> {
    match Role::canonicalize(role) {
        Some(role) if allowed.contains(&role) => Ok(role),
        _ => Err(AuthError::Forbidden),
    }
}
