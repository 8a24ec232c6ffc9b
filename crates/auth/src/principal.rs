//! Authenticated principal
//!
//! A `Principal` is the identity-provider's view of the signed-in user.
//! It is created on login and destroyed on logout; this crate never mints
//! one itself.

use serde::{Deserialize, Serialize};

/// Authenticated identity as reported by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable unique identifier (identity-provider subject)
    pub id: String,

    /// Email address
    pub email: String,

    /// Display name (optional)
    #[serde(default)]
    pub name: Option<String>,
}

impl Principal {
    /// Create a principal with the minimal identifying fields
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
        }
    }

    /// Attach a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name to show in the UI, falling back to the email
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }

    /// Check whether this principal is the same identity as another
    ///
    /// Identity is the stable id alone - emails can be reassigned.
    pub fn is_same(&self, other: &Principal) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_principal() {
        let p = Principal::new("auth0|abc123", "ada@uni.edu");
        assert_eq!(p.id, "auth0|abc123");
        assert_eq!(p.email, "ada@uni.edu");
        assert_eq!(p.display_name(), "ada@uni.edu");
    }

    #[test]
    fn test_with_name() {
        let p = Principal::new("auth0|abc123", "ada@uni.edu").with_name("Ada Lovelace");
        assert_eq!(p.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_is_same_compares_id_only() {
        let a = Principal::new("u-1", "old@uni.edu");
        let b = Principal::new("u-1", "new@uni.edu");
        let c = Principal::new("u-2", "old@uni.edu");
        assert!(a.is_same(&b));
        assert!(!a.is_same(&c));
    }
}
