//! Backend API configuration

use std::time::Duration;

use serde::Deserialize;

/// Backend API client configuration
///
/// # Example
///
/// ```toml
/// [api]
/// url = "https://api.atrium.edu"
/// timeout = "10s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL
    /// Default: "http://localhost:3000"
    pub url: String,

    /// Request timeout
    /// Default: 10 seconds
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}
