//! Role resolution
//!
//! Produces the single current role for the active principal by probing an
//! ordered chain of sources: backend role of record, identity-token role
//! claim, durable local cache. The first source yielding a mapped role
//! wins; if all three fail the resolver falls open to the least-privileged
//! role.
//!
//! Resolution never errors. Source failures and unmapped role strings are
//! logged and treated as "source unavailable"; an unmapped backend value
//! falls through to claims rather than counting as an authoritative
//! "no role".

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info};

use atrium_auth::{IdentityProvider, Principal, Role};
use atrium_client::RoleAuthority;

use crate::cache::{RoleCacheEntry, RoleOrigin, RoleStore};
use crate::error::AccessError;

/// Resolution sources in precedence order
const RESOLUTION_ORDER: [RoleSource; 3] =
    [RoleSource::Backend, RoleSource::Claims, RoleSource::Cache];

/// A single source in the resolution chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoleSource {
    Backend,
    Claims,
    Cache,
}

impl RoleSource {
    fn origin(self) -> RoleOrigin {
        match self {
            Self::Backend => RoleOrigin::Backend,
            Self::Claims => RoleOrigin::Claims,
            Self::Cache => RoleOrigin::Cache,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Backend => "backend",
            Self::Claims => "claims",
            Self::Cache => "cache",
        }
    }
}

/// Session-scoped role cache entry
#[derive(Debug, Clone)]
struct SessionRole {
    principal_id: String,
    role: Role,
}

/// Resolves the current principal's role
///
/// Session-scoped: one resolver per login session, with [`reset`] wired to
/// logout. Construct independent instances in tests - there is no
/// process-wide state.
///
/// Concurrent `resolve` calls for the same principal are not coordinated;
/// last write wins on both caches, and every cache read re-validates the
/// stored principal id, which bounds the damage of a stale write.
///
/// [`reset`]: RoleResolver::reset
pub struct RoleResolver {
    identity: Arc<dyn IdentityProvider>,
    authority: Arc<dyn RoleAuthority>,
    store: Arc<dyn RoleStore>,
    session: RwLock<Option<SessionRole>>,
}

impl RoleResolver {
    /// Create a resolver over the given source boundaries
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        authority: Arc<dyn RoleAuthority>,
        store: Arc<dyn RoleStore>,
    ) -> Self {
        Self {
            identity,
            authority,
            store,
            session: RwLock::new(None),
        }
    }

    /// Resolve the current role
    ///
    /// Always terminates with a role; with no principal signed in this
    /// clears the caches and returns [`Role::DEFAULT`].
    pub async fn resolve(&self) -> Role {
        let Some(principal) = self.identity.current_principal() else {
            self.session.write().take();
            if let Err(e) = self.store.delete().await {
                debug!(error = %e, "failed to clear role cache on logout");
            }
            return Role::DEFAULT;
        };

        // Session hit: staleness within a session is tolerated, so skip
        // the network entirely
        if let Some(cached) = self.session.read().as_ref()
            && cached.principal_id == principal.id
        {
            return cached.role;
        }

        for source in RESOLUTION_ORDER {
            match self.probe(source, &principal).await {
                Ok(role) => {
                    info!(
                        principal = %principal.id,
                        role = %role,
                        source = source.as_str(),
                        "role resolved"
                    );
                    self.adopt(&principal, role, source).await;
                    return role;
                }
                // Recovered locally: fall through to the next source
                Err(e) => debug!(source = source.as_str(), error = %e, "role source skipped"),
            }
        }

        // Every source failed: fall open to the least-privileged role and
        // remember it for this session so we don't hammer the network. A
        // fresh session retries the full chain.
        debug!(principal = %principal.id, "all role sources failed, defaulting");
        *self.session.write() = Some(SessionRole {
            principal_id: principal.id.clone(),
            role: Role::DEFAULT,
        });
        Role::DEFAULT
    }

    /// Forget the session-scoped role (logout hook)
    ///
    /// The next `resolve` runs the full chain again.
    pub fn reset(&self) {
        self.session.write().take();
    }

    /// Forget the session role and delete the durable entry
    pub async fn invalidate(&self) {
        self.reset();
        if let Err(e) = self.store.delete().await {
            debug!(error = %e, "failed to delete role cache entry");
        }
    }

    /// Subscribe to principal changes from the identity provider
    pub fn changes(&self) -> watch::Receiver<Option<Principal>> {
        self.identity.subscribe()
    }

    /// Probe one source for a mapped role
    ///
    /// An unmapped role string counts as source-unavailable, not as an
    /// authoritative "no role" - every error here is recovered by the
    /// caller falling through to the next source.
    async fn probe(&self, source: RoleSource, principal: &Principal) -> Result<Role, AccessError> {
        match source {
            RoleSource::Backend => {
                let response = self
                    .authority
                    .fetch_role()
                    .await
                    .map_err(|e| AccessError::source_unavailable("backend", e.to_string()))?;
                Role::parse(&response.role).ok_or_else(|| {
                    AccessError::source_unavailable(
                        "backend",
                        format!("unmapped role '{}'", response.role),
                    )
                })
            }
            RoleSource::Claims => {
                let claims = self
                    .identity
                    .id_token_claims()
                    .await
                    .map_err(|e| AccessError::source_unavailable("claims", e.to_string()))?;
                let raw = claims
                    .role_claim()
                    .ok_or_else(|| AccessError::source_unavailable("claims", "no role claim"))?;
                Role::parse(raw).ok_or_else(|| {
                    AccessError::source_unavailable("claims", format!("unmapped role '{raw}'"))
                })
            }
            RoleSource::Cache => {
                let entry = self
                    .store
                    .load()
                    .await?
                    .ok_or_else(|| AccessError::source_unavailable("cache", "no entry"))?;

                if !entry.matches(&principal.id) {
                    // Entry belongs to a different (possibly logged-out)
                    // principal - discard it
                    if let Err(e) = self.store.delete().await {
                        debug!(error = %e, "failed to discard mismatched cache entry");
                    }
                    return Err(AccessError::CacheMismatch);
                }

                Ok(entry.role)
            }
        }
    }

    /// Record a successful resolution
    ///
    /// The session cache always gets the role. The durable cache is
    /// rewritten for backend- and claims-sourced roles; a cache hit is not
    /// re-persisted.
    async fn adopt(&self, principal: &Principal, role: Role, source: RoleSource) {
        *self.session.write() = Some(SessionRole {
            principal_id: principal.id.clone(),
            role,
        });

        if source == RoleSource::Cache {
            return;
        }

        let entry = RoleCacheEntry::new(&principal.id, role, source.origin());
        if let Err(e) = self.store.save(&entry).await {
            debug!(error = %e, "failed to persist role cache entry");
        }
    }
}
