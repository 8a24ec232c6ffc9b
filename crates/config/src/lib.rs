//! Atrium Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use atrium_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[api]\nurl = \"https://api.atrium.edu\"").unwrap();
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [api]
//! url = "https://api.atrium.edu"
//! timeout = "10s"
//!
//! [identity]
//! provider = "local"
//! jwt_secret = "your-secret-key-at-least-32-characters-long"
//!
//! [cache]
//! path = "/var/lib/atrium/role_cache.json"
//!
//! [log]
//! level = "info"
//! ```

mod api;
mod cache;
mod error;
mod identity;
mod logging;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use api::ApiConfig;
pub use cache::CacheConfig;
pub use error::{ConfigError, Result};
pub use identity::{HostedIdentityConfig, IdentityConfig};
pub use logging::{LogConfig, LogFormat, LogLevel};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API settings
    pub api: ApiConfig,

    /// Identity provider settings
    pub identity: IdentityConfig,

    /// Durable role cache settings
    pub cache: CacheConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::io_error(path.display().to_string(), e))?;
        Self::from_str(&contents)
    }

    /// Validate cross-field invariants
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn validate(&self) -> Result<()> {
        if self.api.url.trim().is_empty() {
            return Err(ConfigError::missing_field("api", "url"));
        }
        if !(self.api.url.starts_with("http://") || self.api.url.starts_with("https://")) {
            return Err(ConfigError::invalid_value(
                "api",
                "url",
                "must start with http:// or https://",
            ));
        }

        self.identity
            .validate()
            .map_err(|message| ConfigError::invalid_value("identity", "provider", message))?;

        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_has_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.api.url, "http://localhost:3000");
        assert!(config.identity.is_local());
        assert!(config.cache.enabled);
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
[api]
url = "https://api.atrium.edu"
timeout = "30s"

[identity]
provider = "local"
jwt_secret = "this-is-a-very-long-secret-key-for-testing"

[cache]
enabled = true
path = "/var/lib/atrium/role_cache.json"

[log]
level = "debug"
format = "json"
"#;
        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.api.url, "https://api.atrium.edu");
        assert_eq!(config.log.level, LogLevel::Debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_api_url() {
        let toml = r#"
[api]
url = "not-a-url"

[identity]
jwt_secret = "this-is-a-very-long-secret-key-for-testing"
"#;
        let config = Config::from_str(toml).unwrap();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("url"));
    }

    #[test]
    fn test_validation_requires_identity_secret() {
        let config = Config::from_str("").unwrap();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("jwt_secret"));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let result = Config::from_str("[api\nurl = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Config::from_file("/nonexistent/atrium.toml");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
