//! Backend role authority boundary
//!
//! The backend is the source of truth for the role of record and for
//! permission sets. This module defines the trait consumed by the
//! resolution layer plus an in-memory double for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{ClientError, Result};
use crate::types::{PermissionsResponse, UserResponse};

/// Boundary to the backend's role/permission endpoints
///
/// Implementations: [`crate::HttpRoleAuthority`] (production),
/// [`StaticRoleAuthority`] (tests).
#[async_trait]
pub trait RoleAuthority: Send + Sync {
    /// Fetch the role of record for the current principal
    ///
    /// Maps to `GET /users/me`. The role arrives as a raw string.
    async fn fetch_role(&self) -> Result<UserResponse>;

    /// Fetch the live permission set for the current principal
    ///
    /// Maps to `GET /users/permissions/me`.
    async fn fetch_permissions(&self) -> Result<PermissionsResponse>;
}

/// In-memory role authority with scriptable responses
///
/// Defaults to failing every call (backend unreachable); set a role or
/// permissions to script success. Call counts are tracked so tests can
/// assert how many round trips a flow performed.
#[derive(Default)]
pub struct StaticRoleAuthority {
    state: RwLock<StaticState>,
    role_calls: AtomicUsize,
    permission_calls: AtomicUsize,
}

#[derive(Default)]
struct StaticState {
    role: Option<String>,
    permissions: Option<(String, Vec<String>)>,
}

impl StaticRoleAuthority {
    /// Authority that fails every call
    pub fn unreachable() -> Self {
        Self::default()
    }

    /// Authority that reports the given raw role string
    pub fn with_role(role: &str) -> Self {
        let authority = Self::default();
        authority.set_role(Some(role));
        authority
    }

    /// Script the `fetch_role` response (`None` = unreachable)
    pub fn set_role(&self, role: Option<&str>) {
        self.state.write().role = role.map(String::from);
    }

    /// Script the `fetch_permissions` response (`None` = unreachable)
    pub fn set_permissions(&self, role: &str, permissions: &[&str]) {
        self.state.write().permissions = Some((
            role.to_string(),
            permissions.iter().map(|s| s.to_string()).collect(),
        ));
    }

    /// Make `fetch_permissions` fail again
    pub fn clear_permissions(&self) {
        self.state.write().permissions = None;
    }

    /// Number of `fetch_role` calls made
    pub fn role_calls(&self) -> usize {
        self.role_calls.load(Ordering::Relaxed)
    }

    /// Number of `fetch_permissions` calls made
    pub fn permission_calls(&self) -> usize {
        self.permission_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl RoleAuthority for StaticRoleAuthority {
    async fn fetch_role(&self) -> Result<UserResponse> {
        self.role_calls.fetch_add(1, Ordering::Relaxed);
        match self.state.read().role.clone() {
            Some(role) => Ok(UserResponse {
                role,
                id: None,
                email: None,
            }),
            None => Err(ClientError::network("backend unreachable")),
        }
    }

    async fn fetch_permissions(&self) -> Result<PermissionsResponse> {
        self.permission_calls.fetch_add(1, Ordering::Relaxed);
        match self.state.read().permissions.clone() {
            Some((role, permissions)) => Ok(PermissionsResponse { role, permissions }),
            None => Err(ClientError::network("backend unreachable")),
        }
    }
}
