//! Permission snapshot and membership checks
//!
//! The permission set always comes live from the backend - never from the
//! role resolver's caches - because permission checks gate sensitive
//! actions. The snapshot fetch surfaces failures to its caller; the
//! boolean checks swallow them and fail closed. That asymmetry with role
//! resolution (which fails open to viewer) is intentional.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, warn};

use atrium_auth::{IdentityProvider, Permission, Principal, Role};
use atrium_client::RoleAuthority;

use crate::error::{AccessError, Result};

/// Role and permission set for one principal session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSnapshot {
    principal_id: String,
    role: Role,
    permissions: HashSet<Permission>,
}

impl PermissionSnapshot {
    /// Build a snapshot from backend-reported raw values
    ///
    /// Unknown permission tokens and an unmapped role string are dropped
    /// to safe values rather than failing the snapshot.
    pub fn from_raw(principal_id: impl Into<String>, raw_role: &str, raw_permissions: &[String]) -> Self {
        let role = Role::parse(raw_role).unwrap_or_default();
        Self {
            principal_id: principal_id.into(),
            role,
            permissions: Permission::parse_list(raw_permissions).into_iter().collect(),
        }
    }

    /// Role of record the snapshot was taken under
    pub fn role(&self) -> Role {
        self.role
    }

    /// Check membership of a single permission
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// Check that every listed permission is present (AND)
    pub fn has_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has(*p))
    }

    /// Check that at least one listed permission is present (OR)
    pub fn has_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has(*p))
    }

    /// Whether this snapshot belongs to the given principal
    pub fn is_for(&self, principal_id: &str) -> bool {
        self.principal_id == principal_id
    }

    /// Number of granted permissions
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Whether no permissions are granted
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

/// Answers permission membership queries for the active principal
///
/// The snapshot is fetched lazily on the first query of a principal
/// session and discarded when the principal changes, on [`invalidate`],
/// or on logout.
///
/// [`invalidate`]: PermissionResolver::invalidate
pub struct PermissionResolver {
    identity: Arc<dyn IdentityProvider>,
    authority: Arc<dyn RoleAuthority>,
    snapshot: RwLock<Option<PermissionSnapshot>>,
}

impl PermissionResolver {
    /// Create a resolver over the given boundaries
    pub fn new(identity: Arc<dyn IdentityProvider>, authority: Arc<dyn RoleAuthority>) -> Self {
        Self {
            identity,
            authority,
            snapshot: RwLock::new(None),
        }
    }

    /// Fetch the current role and permission set
    ///
    /// # Errors
    ///
    /// - `AccessError::Unauthenticated` if no principal is signed in
    /// - `AccessError::Backend` if the backend call fails - failures
    ///   propagate here rather than defaulting, since callers of this
    ///   method want the authoritative set
    pub async fn permissions(&self) -> Result<PermissionSnapshot> {
        let Some(principal) = self.identity.current_principal() else {
            // Logout discards the snapshot
            self.snapshot.write().take();
            return Err(AccessError::Unauthenticated);
        };

        if let Some(snapshot) = self.snapshot.read().as_ref()
            && snapshot.is_for(&principal.id)
        {
            return Ok(snapshot.clone());
        }

        let response = self.authority.fetch_permissions().await?;
        let snapshot =
            PermissionSnapshot::from_raw(&principal.id, &response.role, &response.permissions);

        debug!(
            principal = %principal.id,
            role = %snapshot.role(),
            granted = snapshot.len(),
            "permission snapshot fetched"
        );

        *self.snapshot.write() = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Check a single permission (fail closed)
    ///
    /// Any failure - no principal, unreachable backend - denies.
    pub async fn has_permission(&self, permission: Permission) -> bool {
        match self.permissions().await {
            Ok(snapshot) => snapshot.has(permission),
            Err(e) => {
                warn!(permission = %permission, error = %e, "permission check failed, denying");
                false
            }
        }
    }

    /// Check that every listed permission is held (AND, fail closed)
    ///
    /// An empty list is vacuously satisfied.
    pub async fn check_all(&self, permissions: &[Permission]) -> bool {
        match self.permissions().await {
            Ok(snapshot) => snapshot.has_all(permissions),
            Err(e) => {
                warn!(error = %e, "permission check failed, denying");
                false
            }
        }
    }

    /// Check that at least one listed permission is held (OR, fail closed)
    ///
    /// An empty list is never satisfied.
    pub async fn check_any(&self, permissions: &[Permission]) -> bool {
        match self.permissions().await {
            Ok(snapshot) => snapshot.has_any(permissions),
            Err(e) => {
                warn!(error = %e, "permission check failed, denying");
                false
            }
        }
    }

    /// Drop the cached snapshot (logout or role change)
    pub fn invalidate(&self) {
        self.snapshot.write().take();
    }

    /// Subscribe to principal changes from the identity provider
    pub fn changes(&self) -> watch::Receiver<Option<Principal>> {
        self.identity.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use atrium_auth::StaticIdentityProvider;
    use atrium_client::StaticRoleAuthority;

    struct Fixture {
        identity: Arc<StaticIdentityProvider>,
        authority: Arc<StaticRoleAuthority>,
        resolver: PermissionResolver,
    }

    fn fixture() -> Fixture {
        let identity = Arc::new(StaticIdentityProvider::new());
        let authority = Arc::new(StaticRoleAuthority::unreachable());
        let resolver = PermissionResolver::new(identity.clone(), authority.clone());
        Fixture {
            identity,
            authority,
            resolver,
        }
    }

    fn login(f: &Fixture, subject: &str) {
        f.identity
            .set_principal(Principal::new(subject, format!("{subject}@uni.edu")), None);
    }

    #[tokio::test]
    async fn test_unauthenticated_snapshot_fetch_errors() {
        let f = fixture();
        let result = f.resolver.permissions().await;
        assert!(matches!(result, Err(AccessError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let f = fixture();
        login(&f, "u-1");
        let result = f.resolver.permissions().await;
        assert!(matches!(result, Err(AccessError::Backend(_))));
    }

    #[tokio::test]
    async fn test_snapshot_fetch_and_membership() {
        let f = fixture();
        login(&f, "u-1");
        f.authority
            .set_permissions("staff", &["MODERATE", "PUBLISH_POST"]);

        let snapshot = f.resolver.permissions().await.unwrap();
        assert_eq!(snapshot.role(), Role::Staff);
        assert!(snapshot.has(Permission::Moderate));
        assert!(snapshot.has(Permission::PublishPost));
        assert!(!snapshot.has(Permission::ManageUsers));
    }

    #[tokio::test]
    async fn test_snapshot_cached_per_session() {
        let f = fixture();
        login(&f, "u-1");
        f.authority.set_permissions("staff", &["MODERATE"]);

        let _ = f.resolver.permissions().await.unwrap();
        let _ = f.resolver.permissions().await.unwrap();
        assert_eq!(f.authority.permission_calls(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_refetched_on_principal_change() {
        let f = fixture();
        login(&f, "u-1");
        f.authority.set_permissions("staff", &["MODERATE"]);
        assert!(f.resolver.has_permission(Permission::Moderate).await);

        login(&f, "u-2");
        f.authority.set_permissions("student", &["SUBMIT"]);
        assert!(!f.resolver.has_permission(Permission::Moderate).await);
        assert!(f.resolver.has_permission(Permission::Submit).await);
        assert_eq!(f.authority.permission_calls(), 2);
    }

    #[tokio::test]
    async fn test_has_permission_fails_closed() {
        let f = fixture();

        // No principal
        assert!(!f.resolver.has_permission(Permission::Moderate).await);

        // Principal but backend down
        login(&f, "u-1");
        assert!(!f.resolver.has_permission(Permission::Moderate).await);
    }

    #[tokio::test]
    async fn test_check_all_and_decomposition() {
        let f = fixture();
        login(&f, "u-1");
        f.authority
            .set_permissions("staff", &["MODERATE", "APPROVE_SUBMISSION"]);

        let both = [Permission::Moderate, Permission::ApproveSubmission];
        assert!(f.resolver.check_all(&both).await);
        assert_eq!(
            f.resolver.check_all(&both).await,
            f.resolver.has_permission(both[0]).await
                && f.resolver.has_permission(both[1]).await
        );

        let partial = [Permission::Moderate, Permission::ManageUsers];
        assert!(!f.resolver.check_all(&partial).await);
    }

    #[tokio::test]
    async fn test_check_any_or_decomposition() {
        let f = fixture();
        login(&f, "u-1");
        f.authority.set_permissions("staff", &["MODERATE"]);

        let mixed = [Permission::ManageUsers, Permission::Moderate];
        assert!(f.resolver.check_any(&mixed).await);
        assert_eq!(
            f.resolver.check_any(&mixed).await,
            f.resolver.has_permission(mixed[0]).await
                || f.resolver.has_permission(mixed[1]).await
        );

        let none = [Permission::ManageUsers, Permission::ManageSite];
        assert!(!f.resolver.check_any(&none).await);
    }

    #[tokio::test]
    async fn test_empty_lists() {
        let f = fixture();
        login(&f, "u-1");
        f.authority.set_permissions("viewer", &[]);

        assert!(f.resolver.check_all(&[]).await);
        assert!(!f.resolver.check_any(&[]).await);
    }

    #[tokio::test]
    async fn test_unknown_backend_tokens_are_skipped() {
        let f = fixture();
        login(&f, "u-1");
        f.authority
            .set_permissions("staff", &["MODERATE", "SOME_FUTURE_THING"]);

        let snapshot = f.resolver.permissions().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.has(Permission::Moderate));
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let f = fixture();
        login(&f, "u-1");
        f.authority.set_permissions("staff", &["MODERATE"]);
        assert!(f.resolver.has_permission(Permission::Moderate).await);

        // Role changed server-side; snapshot is stale until invalidated
        f.authority.set_permissions("viewer", &[]);
        assert!(f.resolver.has_permission(Permission::Moderate).await);

        f.resolver.invalidate();
        assert!(!f.resolver.has_permission(Permission::Moderate).await);
    }

    #[tokio::test]
    async fn test_unmapped_role_defaults_in_snapshot() {
        let f = fixture();
        login(&f, "u-1");
        f.authority.set_permissions("mystery_role", &["MODERATE"]);

        let snapshot = f.resolver.permissions().await.unwrap();
        // Permission set is still authoritative even when the role string
        // is unknown to this client version
        assert_eq!(snapshot.role(), Role::Viewer);
        assert!(snapshot.has(Permission::Moderate));
    }
}
