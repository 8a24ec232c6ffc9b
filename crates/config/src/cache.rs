//! Durable role cache configuration

use std::path::PathBuf;

use serde::Deserialize;

/// Durable role cache configuration
///
/// The cache stores the last resolved (principal, role) pair so the portal
/// stays usable when the backend and identity provider are unreachable.
///
/// # Example
///
/// ```toml
/// [cache]
/// enabled = true
/// path = "/var/lib/atrium/role_cache.json"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether the durable cache is written and consulted
    /// Default: true
    pub enabled: bool,

    /// Cache file location
    /// Default: `~/.atrium/role_cache.json`
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

impl CacheConfig {
    /// Resolve the cache file path, falling back to the default location
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.path {
            return Some(path.clone());
        }
        dirs::home_dir().map(|home| home.join(".atrium").join("role_cache.json"))
    }
}
