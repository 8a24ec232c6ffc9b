//! Permission catalog
//!
//! Atomic capability tokens gating portal actions. A role's permission set
//! is explicit membership reported by the backend - permissions are never
//! inferred from role rank.
//!
//! Wire form is upper snake case (`"APPROVE_SUBMISSION"`); parsing is
//! case-insensitive and unknown tokens are skipped, not errors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission for a specific portal capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// Submit a publication for review
    Submit,
    /// Approve or reject submitted publications
    ApproveSubmission,
    /// Moderate comments and flagged content
    Moderate,
    /// Publish blog posts
    PublishPost,
    /// Create and manage events
    ManageEvents,
    /// Manage user accounts and role assignments
    ManageUsers,
    /// Change site-wide settings
    ManageSite,
}

impl Permission {
    /// Parse a permission token (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SUBMIT" => Some(Self::Submit),
            "APPROVE_SUBMISSION" => Some(Self::ApproveSubmission),
            "MODERATE" => Some(Self::Moderate),
            "PUBLISH_POST" => Some(Self::PublishPost),
            "MANAGE_EVENTS" => Some(Self::ManageEvents),
            "MANAGE_USERS" => Some(Self::ManageUsers),
            "MANAGE_SITE" => Some(Self::ManageSite),
            _ => None,
        }
    }

    /// Convert to the wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "SUBMIT",
            Self::ApproveSubmission => "APPROVE_SUBMISSION",
            Self::Moderate => "MODERATE",
            Self::PublishPost => "PUBLISH_POST",
            Self::ManageEvents => "MANAGE_EVENTS",
            Self::ManageUsers => "MANAGE_USERS",
            Self::ManageSite => "MANAGE_SITE",
        }
    }

    /// Parse a list of raw tokens, skipping anything unrecognized
    ///
    /// The backend may report permissions this client version does not
    /// know about; those are dropped rather than failing the whole list.
    pub fn parse_list<I, S>(raw: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .filter_map(|s| Self::parse(s.as_ref()))
            .collect()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_parsing() {
        assert_eq!(Permission::parse("SUBMIT"), Some(Permission::Submit));
        assert_eq!(
            Permission::parse("APPROVE_SUBMISSION"),
            Some(Permission::ApproveSubmission)
        );
        assert_eq!(Permission::parse("MODERATE"), Some(Permission::Moderate));
        assert_eq!(Permission::parse("MANAGE_USERS"), Some(Permission::ManageUsers));
        assert_eq!(Permission::parse("invalid"), None);
    }

    #[test]
    fn test_parsing_is_case_insensitive() {
        assert_eq!(Permission::parse("moderate"), Some(Permission::Moderate));
        assert_eq!(Permission::parse("Publish_Post"), Some(Permission::PublishPost));
    }

    #[test]
    fn test_parse_list_skips_unknown() {
        let parsed = Permission::parse_list(["MODERATE", "FUTURE_PERMISSION", "SUBMIT"]);
        assert_eq!(parsed, vec![Permission::Moderate, Permission::Submit]);
    }

    #[test]
    fn test_parse_list_empty() {
        let parsed = Permission::parse_list(Vec::<String>::new());
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_wire_round_trip() {
        for p in [
            Permission::Submit,
            Permission::ApproveSubmission,
            Permission::Moderate,
            Permission::PublishPost,
            Permission::ManageEvents,
            Permission::ManageUsers,
            Permission::ManageSite,
        ] {
            assert_eq!(Permission::parse(p.as_str()), Some(p));
        }
    }
}
