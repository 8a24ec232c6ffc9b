//! Wire types for the portal backend API
//!
//! Role and permission values arrive as raw strings; mapping to the closed
//! enums happens in the consumer so unknown values can fall through instead
//! of failing the request.

use serde::Deserialize;

/// Response from `GET /users/me`
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    /// Role of record (raw string, case-insensitive)
    pub role: String,

    /// User id as the backend knows it
    #[serde(default)]
    pub id: Option<String>,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,
}

/// Response from `GET /users/permissions/me`
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionsResponse {
    /// Role of record (raw string)
    pub role: String,

    /// Granted permission tokens (raw strings, upper snake case)
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_minimal() {
        let parsed: UserResponse = serde_json::from_str(r#"{"role": "ADMIN"}"#).unwrap();
        assert_eq!(parsed.role, "ADMIN");
        assert!(parsed.id.is_none());
    }

    #[test]
    fn test_user_response_full() {
        let json = r#"{"role": "staff", "id": "u-7", "email": "grace@uni.edu"}"#;
        let parsed: UserResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.role, "staff");
        assert_eq!(parsed.id.as_deref(), Some("u-7"));
    }

    #[test]
    fn test_permissions_response() {
        let json = r#"{"role": "staff", "permissions": ["MODERATE", "PUBLISH_POST"]}"#;
        let parsed: PermissionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.role, "staff");
        assert_eq!(parsed.permissions, vec!["MODERATE", "PUBLISH_POST"]);
    }

    #[test]
    fn test_permissions_response_defaults_empty() {
        let parsed: PermissionsResponse = serde_json::from_str(r#"{"role": "viewer"}"#).unwrap();
        assert!(parsed.permissions.is_empty());
    }
}
