//! Identity-token claims
//!
//! Structure of the signed identity token issued by the identity provider.
//! The `role` claim is advisory - the backend role of record takes
//! precedence during resolution - but it is the second source in the
//! fallback chain when the backend is unreachable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Claims embedded in an Atrium identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Subject (stable principal identifier)
    #[serde(rename = "sub")]
    pub subject: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Role claim (raw string; mapped case-insensitively during resolution)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Issued at (Unix timestamp)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Not before (Unix timestamp)
    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<i64>,

    /// Issuer
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Provider-specific custom claims (namespaced keys)
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

/// Namespaced custom claim some identity providers use for the role
pub const ROLE_CLAIM_KEY: &str = "https://atrium.edu/role";

impl IdTokenClaims {
    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        self.expires_at < now
    }

    /// Check if the token is not yet valid
    pub fn is_not_yet_valid(&self) -> bool {
        if let Some(nbf) = self.not_before {
            let now = chrono::Utc::now().timestamp();
            nbf > now
        } else {
            false
        }
    }

    /// Validate token timing
    pub fn validate_timing(&self) -> Result<(), &'static str> {
        if self.is_expired() {
            return Err("token expired");
        }
        if self.is_not_yet_valid() {
            return Err("token not yet valid");
        }
        Ok(())
    }

    /// Extract the raw role claim, if any
    ///
    /// Checks the plain `role` claim first, then the namespaced custom
    /// claim. Returns the raw string; mapping to [`crate::Role`] happens
    /// at resolution time so an unmapped value can fall through.
    pub fn role_claim(&self) -> Option<&str> {
        if let Some(role) = self.role.as_deref() {
            return Some(role);
        }
        self.custom.get(ROLE_CLAIM_KEY).and_then(|v| v.as_str())
    }
}
