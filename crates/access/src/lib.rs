//! Atrium - Access control core
//!
//! Role resolution, permission membership checks, and access guards for
//! the portal client.
//!
//! # Overview
//!
//! Three possibly-inconsistent sources describe a principal's role: the
//! backend role of record, the identity-token role claim, and a durable
//! local cache. [`RoleResolver`] reconciles them with strict precedence
//! and always lands on a role - falling open to `Viewer` when nothing is
//! usable. [`PermissionResolver`] answers membership queries against the
//! live backend permission set and fails closed. Guards wrap both behind
//! a `Pending -> Granted | Denied` state machine for the UI.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use atrium_access::{PermissionGuard, RoleResolver, PermissionResolver, store_from_config};
//! use atrium_auth::{JwtIdentityProvider, Permission};
//! use atrium_client::HttpRoleAuthority;
//! use atrium_config::Config;
//!
//! let config = Config::from_file("atrium.toml")?;
//! let identity = Arc::new(JwtIdentityProvider::new(secret));
//! let authority = Arc::new(HttpRoleAuthority::from_config(&config.api, tokens)?);
//!
//! let roles = Arc::new(RoleResolver::new(
//!     identity.clone(),
//!     authority.clone(),
//!     store_from_config(&config.cache)?,
//! ));
//! let permissions = Arc::new(PermissionResolver::new(identity, authority));
//!
//! let mut guard = PermissionGuard::single(permissions, Permission::Moderate);
//! if guard.resolve().await.is_granted() {
//!     // render the moderation queue
//! }
//! ```

mod cache;
mod error;
mod guard;
mod resolver;
mod snapshot;

// Role resolution
pub use resolver::RoleResolver;

// Permission checks
pub use snapshot::{PermissionResolver, PermissionSnapshot};

// Guards
pub use guard::{
    DeniedAction, GuardState, HOME_REDIRECT, LOGIN_REDIRECT, PermissionGuard,
    PermissionRequirement, RoleGuard,
};

// Durable cache
pub use cache::{
    FileRoleStore, MemoryRoleStore, NoopRoleStore, RoleCacheEntry, RoleOrigin, RoleStore,
    store_from_config,
};

// Errors
pub use error::{AccessError, Result};
