//! Identity provider adapters
//!
//! Defines the `IdentityProvider` trait - the boundary to whatever issues
//! and refreshes identity tokens. The portal core only ever observes the
//! provider: it never creates or destroys principals itself.
//!
//! Login/logout notification is a `tokio::sync::watch` channel carrying
//! the current principal; consumers subscribe and re-resolve on change.

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::watch;

use crate::claims::IdTokenClaims;
use crate::error::{AuthError, Result};
use crate::principal::Principal;

/// Identity provider boundary
///
/// Implementations: [`StaticIdentityProvider`] (tests/development),
/// [`crate::JwtIdentityProvider`] (self-hosted deployments).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in principal, if any
    fn current_principal(&self) -> Option<Principal>;

    /// Claims from the current identity token
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if no token is held or the token cannot be
    /// decoded. Callers in the resolution chain swallow this and fall
    /// through to the next source.
    async fn id_token_claims(&self) -> Result<IdTokenClaims>;

    /// Subscribe to principal changes (login/logout)
    ///
    /// The receiver yields the new current principal on every change.
    fn subscribe(&self) -> watch::Receiver<Option<Principal>>;

    /// Provider name for logging/debugging
    fn name(&self) -> &'static str;
}

/// Identity provider with directly settable state
///
/// Intended for tests and local development; `set_principal` and `clear`
/// stand in for the real provider's login/logout events.
pub struct StaticIdentityProvider {
    state: RwLock<StaticState>,
    tx: watch::Sender<Option<Principal>>,
}

#[derive(Default)]
struct StaticState {
    principal: Option<Principal>,
    claims: Option<IdTokenClaims>,
    claims_fail: bool,
}

impl Default for StaticIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticIdentityProvider {
    /// Create a provider with no principal signed in
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            state: RwLock::new(StaticState::default()),
            tx,
        }
    }

    /// Sign a principal in, optionally with token claims
    pub fn set_principal(&self, principal: Principal, claims: Option<IdTokenClaims>) {
        {
            let mut state = self.state.write();
            state.principal = Some(principal.clone());
            state.claims = claims;
        }
        let _ = self.tx.send(Some(principal));
    }

    /// Sign out
    pub fn clear(&self) {
        {
            let mut state = self.state.write();
            state.principal = None;
            state.claims = None;
        }
        let _ = self.tx.send(None);
    }

    /// Make subsequent `id_token_claims` calls fail (simulates an
    /// unreachable provider)
    pub fn fail_claims(&self, fail: bool) {
        self.state.write().claims_fail = fail;
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    fn current_principal(&self) -> Option<Principal> {
        self.state.read().principal.clone()
    }

    async fn id_token_claims(&self) -> Result<IdTokenClaims> {
        let state = self.state.read();
        if state.claims_fail {
            return Err(AuthError::provider_unavailable("claims unavailable"));
        }
        state.claims.clone().ok_or(AuthError::MissingToken)
    }

    fn subscribe(&self) -> watch::Receiver<Option<Principal>> {
        self.tx.subscribe()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
