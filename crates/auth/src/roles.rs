//! Portal roles
//!
//! Closed set of four roles with a capability ordering.
//!
//! # Roles (capability order)
//!
//! - `Viewer` - Browse published content
//! - `Student` - Submit work, comment
//! - `Staff` - Moderate and publish
//! - `Administrator` - Manage users and site settings
//!
//! The ordering compares capability only. Permissions are explicit set
//! membership reported by the backend, never derived from rank - see
//! [`crate::Permission`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// User role in the portal (ordered by capability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Browse published publications, posts, and events
    Viewer = 0,
    /// Submit publications, comment on posts
    Student = 1,
    /// Moderate submissions, publish posts, run events
    Staff = 2,
    /// Manage users, roles, and site settings
    Administrator = 3,
}

impl Role {
    /// Default role for unauthenticated or unresolved principals
    pub const DEFAULT: Role = Role::Viewer;

    /// Parse a raw role string (case-insensitive)
    ///
    /// Unrecognized values return `None` - callers treat that as
    /// "no mapping", never as an error.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "viewer" | "guest" | "readonly" => Some(Self::Viewer),
            "student" => Some(Self::Student),
            "staff" | "faculty" | "editor" => Some(Self::Staff),
            "administrator" | "admin" => Some(Self::Administrator),
            _ => None,
        }
    }

    /// Convert to the canonical string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Student => "student",
            Self::Staff => "staff",
            Self::Administrator => "administrator",
        }
    }

    /// Check if this role sits at or above another in capability
    pub fn outranks(&self, other: Role) -> bool {
        *self >= other
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
