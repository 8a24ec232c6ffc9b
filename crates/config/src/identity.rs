//! Identity provider configuration
//!
//! Supports two provider modes:
//! - **Local**: self-hosted portals validating HS256 identity tokens
//! - **Hosted**: an external identity service (claims arrive pre-validated)

use serde::Deserialize;

/// Identity provider configuration
///
/// # Example
///
/// ## Local tokens (default for self-hosted)
/// ```toml
/// [identity]
/// provider = "local"
/// jwt_secret = "your-secret-key-at-least-32-characters-long"
/// issuer = "atrium"
/// ```
///
/// ## Hosted identity service
/// ```toml
/// [identity]
/// provider = "hosted"
///
/// [identity.hosted]
/// domain = "atrium.eu.auth0.com"
/// client_id = "client_..."
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Identity provider: "local" or "hosted"
    /// Default: "local"
    pub provider: String,

    /// Shared secret for validating local identity tokens
    /// Must be at least 32 characters
    pub jwt_secret: Option<String>,

    /// Required issuer claim (optional)
    pub issuer: Option<String>,

    /// Hosted provider settings
    #[serde(default)]
    pub hosted: Option<HostedIdentityConfig>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            provider: "local".to_string(),
            jwt_secret: None,
            issuer: Some("atrium".to_string()),
            hosted: None,
        }
    }
}

impl IdentityConfig {
    /// Check if using local token validation
    pub fn is_local(&self) -> bool {
        self.provider == "local"
    }

    /// Check if using a hosted identity service
    pub fn is_hosted(&self) -> bool {
        self.provider == "hosted"
    }

    /// Get the JWT secret bytes, if configured
    pub fn jwt_secret_bytes(&self) -> Option<&[u8]> {
        self.jwt_secret.as_ref().map(|s| s.as_bytes())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        match self.provider.as_str() {
            "local" => {
                let Some(secret) = self.jwt_secret.as_ref() else {
                    return Err("identity.jwt_secret is required for local provider".to_string());
                };
                if secret.len() < 32 {
                    return Err(
                        "identity.jwt_secret must be at least 32 characters".to_string()
                    );
                }
            }
            "hosted" => {
                let hosted = self
                    .hosted
                    .as_ref()
                    .ok_or("identity.hosted section is required when provider = \"hosted\"")?;
                if hosted.domain.is_empty() {
                    return Err("identity.hosted.domain is required".to_string());
                }
                if hosted.client_id.is_empty() {
                    return Err("identity.hosted.client_id is required".to_string());
                }
            }
            other => {
                return Err(format!(
                    "unknown identity provider '{}', expected 'local' or 'hosted'",
                    other
                ));
            }
        }
        Ok(())
    }
}

/// Hosted identity service settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HostedIdentityConfig {
    /// Provider domain
    #[serde(default)]
    pub domain: String,

    /// OAuth client ID
    #[serde(default)]
    pub client_id: String,

    /// Audience for issued tokens
    pub audience: Option<String>,
}
