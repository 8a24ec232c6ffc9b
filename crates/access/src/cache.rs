//! Durable role cache
//!
//! A single locally persisted (principal, role) record used as the
//! last-resort resolution source when the backend and identity provider
//! are both unusable. Entries carry no TTL - validity is principal-id
//! equality alone, checked by the consumer on every read.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use atrium_auth::Role;
use atrium_config::CacheConfig;

use crate::error::{AccessError, Result};

/// Where a resolved role came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleOrigin {
    /// Backend role of record
    Backend,
    /// Identity-token role claim
    Claims,
    /// Durable local cache
    Cache,
    /// Fallback default (viewer)
    Default,
}

/// Durably cached role record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCacheEntry {
    /// Principal the role was resolved for
    pub principal_id: String,

    /// Resolved role
    pub role: Role,

    /// Source the role was adopted from
    pub origin: RoleOrigin,

    /// When the entry was written
    pub stored_at: DateTime<Utc>,
}

impl RoleCacheEntry {
    /// Create an entry stamped with the current time
    pub fn new(principal_id: impl Into<String>, role: Role, origin: RoleOrigin) -> Self {
        Self {
            principal_id: principal_id.into(),
            role,
            origin,
            stored_at: Utc::now(),
        }
    }

    /// Check whether this entry belongs to the given principal
    pub fn matches(&self, principal_id: &str) -> bool {
        self.principal_id == principal_id
    }
}

/// Durable role store boundary
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Load the stored entry, if any
    ///
    /// A missing or unreadable entry is `Ok(None)`, not an error - the
    /// cache is advisory.
    async fn load(&self) -> Result<Option<RoleCacheEntry>>;

    /// Write the entry, replacing any previous one
    async fn save(&self, entry: &RoleCacheEntry) -> Result<()>;

    /// Delete the stored entry (logout)
    async fn delete(&self) -> Result<()>;
}

/// File-backed role store
///
/// The entry lives in a single JSON document, written atomically and
/// restricted to the owning user on Unix. A corrupt file is treated as
/// absent rather than an error.
#[derive(Debug)]
pub struct FileRoleStore {
    path: PathBuf,
}

impl FileRoleStore {
    /// Create a store at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store from the `[cache]` config section
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Store` if no path is configured and the home
    /// directory cannot be determined.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let path = config
            .resolved_path()
            .ok_or_else(|| AccessError::store("no cache path and no home directory"))?;
        Ok(Self::new(path))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RoleStore for FileRoleStore {
    async fn load(&self) -> Result<Option<RoleCacheEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "role cache unreadable");
                return Ok(None);
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "role cache corrupt, ignoring");
                Ok(None)
            }
        }
    }

    async fn save(&self, entry: &RoleCacheEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AccessError::store(e.to_string()))?;
        }

        let json =
            serde_json::to_string_pretty(entry).map_err(|e| AccessError::store(e.to_string()))?;

        // Write to a sibling temp file then rename so readers never see a
        // half-written entry
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| AccessError::store(e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&tmp)
                .map_err(|e| AccessError::store(e.to_string()))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp, perms).map_err(|e| AccessError::store(e.to_string()))?;
        }

        fs::rename(&tmp, &self.path).map_err(|e| AccessError::store(e.to_string()))
    }

    async fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AccessError::store(e.to_string())),
        }
    }
}

/// In-memory role store for tests
#[derive(Debug, Default)]
pub struct MemoryRoleStore {
    inner: RwLock<Option<RoleCacheEntry>>,
}

impl MemoryRoleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with an entry
    pub fn with_entry(entry: RoleCacheEntry) -> Self {
        Self {
            inner: RwLock::new(Some(entry)),
        }
    }

    /// Peek at the stored entry
    pub fn entry(&self) -> Option<RoleCacheEntry> {
        self.inner.read().clone()
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn load(&self) -> Result<Option<RoleCacheEntry>> {
        Ok(self.inner.read().clone())
    }

    async fn save(&self, entry: &RoleCacheEntry) -> Result<()> {
        *self.inner.write() = Some(entry.clone());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        *self.inner.write() = None;
        Ok(())
    }
}

/// Role store that never persists anything
///
/// Used when the durable cache is disabled in config.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRoleStore;

#[async_trait]
impl RoleStore for NoopRoleStore {
    async fn load(&self) -> Result<Option<RoleCacheEntry>> {
        Ok(None)
    }

    async fn save(&self, _entry: &RoleCacheEntry) -> Result<()> {
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        Ok(())
    }
}

/// Build the role store described by config
///
/// # Errors
///
/// Returns `AccessError::Store` if an enabled cache has no usable path.
pub fn store_from_config(config: &CacheConfig) -> Result<Arc<dyn RoleStore>> {
    if !config.enabled {
        return Ok(Arc::new(NoopRoleStore));
    }
    Ok(Arc::new(FileRoleStore::from_config(config)?))
}
