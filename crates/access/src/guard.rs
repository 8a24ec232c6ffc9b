//! Access guards
//!
//! Declarative gates the UI composes around protected views. Each guard is
//! a small state machine: `Pending` until resolution settles, then
//! `Granted` or `Denied`. While `Pending` the caller renders a neutral
//! "verifying access" indicator - protected content must never flash
//! before a verdict.
//!
//! Guards subscribe to the identity provider's principal channel; a
//! login/logout or a requirement change drops them back to `Pending` so no
//! stale grant survives. Verdicts are never shared between instances -
//! every mount constructs a fresh guard and re-resolves.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use atrium_auth::{Permission, Principal, Role};

use crate::resolver::RoleResolver;
use crate::snapshot::PermissionResolver;

/// Authentication entry point denied permission guards redirect to
pub const LOGIN_REDIRECT: &str = "/login";

/// Generic destination denied role guards redirect to
pub const HOME_REDIRECT: &str = "/";

/// Guard lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Resolution has not settled; render a neutral indicator
    Pending,
    /// Access allowed; render the protected content
    Granted,
    /// Access denied; apply the guard's denied action
    Denied,
}

impl GuardState {
    /// Whether the protected content may render
    pub fn is_granted(&self) -> bool {
        *self == Self::Granted
    }
}

/// What the UI does when a guard lands on `Denied`
///
/// The action never carries the internal reason for denial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeniedAction {
    /// Navigate to the given path
    Redirect(String),
    /// Render the caller-supplied fallback in place
    Fallback,
}

/// Permission requirement modes for [`PermissionGuard`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRequirement {
    /// A single permission must be held
    Single(Permission),
    /// Every listed permission must be held (AND)
    All(Vec<Permission>),
    /// At least one listed permission must be held (OR)
    Any(Vec<Permission>),
}

impl PermissionRequirement {
    async fn satisfied(&self, resolver: &PermissionResolver) -> bool {
        match self {
            Self::Single(p) => resolver.has_permission(*p).await,
            Self::All(ps) => resolver.check_all(ps).await,
            Self::Any(ps) => resolver.check_any(ps).await,
        }
    }
}

/// Guard gating content on role membership
///
/// # Example
///
/// ```ignore
/// let mut guard = RoleGuard::new(resolver, vec![Role::Staff, Role::Administrator]);
/// match guard.resolve().await {
///     GuardState::Granted => render_moderation_queue(),
///     GuardState::Denied => navigate(guard.denied_action()),
///     GuardState::Pending => unreachable!("resolve always settles"),
/// }
/// ```
pub struct RoleGuard {
    resolver: Arc<RoleResolver>,
    changes: watch::Receiver<Option<Principal>>,
    allowed: Vec<Role>,
    redirect: String,
    state: GuardState,
}

impl RoleGuard {
    /// Create a guard allowing the given roles
    ///
    /// Starts `Pending`; nothing is resolved until [`resolve`] runs.
    ///
    /// [`resolve`]: RoleGuard::resolve
    pub fn new(resolver: Arc<RoleResolver>, allowed: Vec<Role>) -> Self {
        let changes = resolver.changes();
        Self {
            resolver,
            changes,
            allowed,
            redirect: HOME_REDIRECT.to_string(),
            state: GuardState::Pending,
        }
    }

    /// Override the denied redirect destination
    #[must_use]
    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect = path.into();
        self
    }

    /// Replace the allowed roles, resetting to `Pending`
    pub fn set_allowed(&mut self, allowed: Vec<Role>) {
        self.allowed = allowed;
        self.state = GuardState::Pending;
    }

    /// Current state, accounting for principal changes
    ///
    /// A login/logout since the last resolution drops the guard back to
    /// `Pending`.
    pub fn state(&mut self) -> GuardState {
        if self.changes.has_changed().unwrap_or(false) {
            self.state = GuardState::Pending;
        }
        self.state
    }

    /// Run resolution and settle the verdict
    ///
    /// Never errors; an unresolvable role lands on the default and is
    /// judged like any other.
    pub async fn resolve(&mut self) -> GuardState {
        self.changes.mark_unchanged();
        self.state = GuardState::Pending;

        let role = self.resolver.resolve().await;
        self.state = if self.allowed.contains(&role) {
            GuardState::Granted
        } else {
            debug!(role = %role, "role guard denied");
            GuardState::Denied
        };
        self.state
    }

    /// Action to apply when denied
    pub fn denied_action(&self) -> DeniedAction {
        DeniedAction::Redirect(self.redirect.clone())
    }
}

/// Guard gating content on permission membership
///
/// Supports single, AND-list, and OR-list requirements. Denial either
/// renders a caller-supplied fallback or redirects to the authentication
/// entry point - an unauthenticated principal always denies rather than
/// erroring into the render tree.
pub struct PermissionGuard {
    resolver: Arc<PermissionResolver>,
    changes: watch::Receiver<Option<Principal>>,
    requirement: PermissionRequirement,
    denied: DeniedAction,
    state: GuardState,
}

impl PermissionGuard {
    /// Create a guard for the given requirement
    pub fn new(resolver: Arc<PermissionResolver>, requirement: PermissionRequirement) -> Self {
        let changes = resolver.changes();
        Self {
            resolver,
            changes,
            requirement,
            denied: DeniedAction::Redirect(LOGIN_REDIRECT.to_string()),
            state: GuardState::Pending,
        }
    }

    /// Guard on a single permission
    pub fn single(resolver: Arc<PermissionResolver>, permission: Permission) -> Self {
        Self::new(resolver, PermissionRequirement::Single(permission))
    }

    /// Guard requiring every listed permission (AND)
    pub fn all(resolver: Arc<PermissionResolver>, permissions: Vec<Permission>) -> Self {
        Self::new(resolver, PermissionRequirement::All(permissions))
    }

    /// Guard requiring at least one listed permission (OR)
    pub fn any(resolver: Arc<PermissionResolver>, permissions: Vec<Permission>) -> Self {
        Self::new(resolver, PermissionRequirement::Any(permissions))
    }

    /// Render a caller-supplied fallback on denial instead of redirecting
    #[must_use]
    pub fn with_fallback(mut self) -> Self {
        self.denied = DeniedAction::Fallback;
        self
    }

    /// Redirect to the given path on denial
    #[must_use]
    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.denied = DeniedAction::Redirect(path.into());
        self
    }

    /// Replace the requirement, resetting to `Pending`
    pub fn set_requirement(&mut self, requirement: PermissionRequirement) {
        self.requirement = requirement;
        self.state = GuardState::Pending;
    }

    /// Current state, accounting for principal changes
    pub fn state(&mut self) -> GuardState {
        if self.changes.has_changed().unwrap_or(false) {
            self.state = GuardState::Pending;
        }
        self.state
    }

    /// Run the permission checks and settle the verdict
    ///
    /// Checks fail closed, so this never errors into the caller.
    pub async fn resolve(&mut self) -> GuardState {
        self.changes.mark_unchanged();
        self.state = GuardState::Pending;

        self.state = if self.requirement.satisfied(&self.resolver).await {
            GuardState::Granted
        } else {
            debug!("permission guard denied");
            GuardState::Denied
        };
        self.state
    }

    /// Action to apply when denied
    pub fn denied_action(&self) -> &DeniedAction {
        &self.denied
    }
}
