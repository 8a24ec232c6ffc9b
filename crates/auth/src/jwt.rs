//! Local JWT identity provider
//!
//! Validates HS256 identity tokens signed with a shared secret and holds
//! the current login session. This is the default provider for self-hosted
//! portals; hosted deployments plug in their own [`IdentityProvider`].

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::claims::IdTokenClaims;
use crate::error::{AuthError, Result};
use crate::identity::IdentityProvider;
use crate::principal::Principal;

/// Identity provider backed by locally validated JWTs
///
/// # Example
///
/// ```
/// use atrium_auth::JwtIdentityProvider;
///
/// let provider = JwtIdentityProvider::new(b"your-secret-key-at-least-32-bytes!");
/// ```
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
    session: RwLock<Option<TokenSession>>,
    tx: watch::Sender<Option<Principal>>,
}

struct TokenSession {
    token: String,
    principal: Principal,
}

impl std::fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityProvider")
            .field("algorithm", &"HS256")
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtIdentityProvider {
    /// Create a new provider with an HMAC-SHA256 secret
    ///
    /// # Arguments
    ///
    /// * `secret` - Secret key for HMAC-SHA256 (should be at least 32 bytes)
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // Don't require specific claims - we check them ourselves
        validation.required_spec_claims.clear();

        let (tx, _rx) = watch::channel(None);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: None,
            session: RwLock::new(None),
            tx,
        }
    }

    /// Require a specific `iss` claim on accepted tokens
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        self.validation.set_issuer(&[&issuer]);
        self.issuer = Some(issuer);
        self
    }

    /// Accept an identity token and sign its principal in
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the signature, timing, or claims are
    /// invalid. On success the principal-change channel fires.
    pub fn login(&self, token: &str) -> Result<Principal> {
        let claims = self.decode(token)?;

        if claims.subject.is_empty() {
            return Err(AuthError::invalid_claims("empty sub claim"));
        }

        let mut principal = Principal::new(&claims.subject, &claims.email);
        if let Some(name) = &claims.name {
            principal = principal.with_name(name);
        }

        *self.session.write() = Some(TokenSession {
            token: token.to_string(),
            principal: principal.clone(),
        });
        let _ = self.tx.send(Some(principal.clone()));

        info!(principal = %principal.id, "Principal signed in");
        Ok(principal)
    }

    /// Sign the current principal out
    ///
    /// Clears the held token and fires the principal-change channel.
    pub fn logout(&self) {
        let had_session = self.session.write().take().is_some();
        let _ = self.tx.send(None);
        if had_session {
            info!("Principal signed out");
        }
    }

    /// Decode and verify a token against the configured key
    fn decode(&self, token: &str) -> Result<IdTokenClaims> {
        let token_data = decode::<IdTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("identity token validation failed: {:?}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                        AuthError::TokenNotYetValid
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    _ => AuthError::InvalidClaims(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    fn current_principal(&self) -> Option<Principal> {
        self.session.read().as_ref().map(|s| s.principal.clone())
    }

    async fn id_token_claims(&self) -> Result<IdTokenClaims> {
        // Re-decode the held token so expiry is enforced on every read
        let token = {
            let session = self.session.read();
            session
                .as_ref()
                .map(|s| s.token.clone())
                .ok_or(AuthError::MissingToken)?
        };
        self.decode(&token)
    }

    fn subscribe(&self) -> watch::Receiver<Option<Principal>> {
        self.tx.subscribe()
    }

    fn name(&self) -> &'static str {
        "local-jwt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{TEST_SECRET, TokenSpec, create_test_token};

    #[tokio::test]
    async fn test_login_with_valid_token() {
        let provider = JwtIdentityProvider::new(TEST_SECRET);
        let token = create_test_token(TokenSpec::new("u-1", "ada@uni.edu").role("staff"));

        let principal = provider.login(&token).unwrap();
        assert_eq!(principal.id, "u-1");
        assert_eq!(principal.email, "ada@uni.edu");
        assert_eq!(provider.current_principal().unwrap().id, "u-1");

        let claims = provider.id_token_claims().await.unwrap();
        assert_eq!(claims.role_claim(), Some("staff"));
    }

    #[tokio::test]
    async fn test_login_with_wrong_secret_fails() {
        let provider = JwtIdentityProvider::new(TEST_SECRET);
        let token = create_test_token(
            TokenSpec::new("u-1", "ada@uni.edu").secret(b"different-secret-key-32-bytes!!!"),
        );

        let result = provider.login(&token);
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
        assert!(provider.current_principal().is_none());
    }

    #[tokio::test]
    async fn test_login_with_expired_token_fails() {
        let provider = JwtIdentityProvider::new(TEST_SECRET);
        let token = create_test_token(TokenSpec::new("u-1", "ada@uni.edu").expired());

        let result = provider.login(&token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_issuer_validation() {
        let provider = JwtIdentityProvider::new(TEST_SECRET).with_issuer("atrium");

        let good = create_test_token(TokenSpec::new("u-1", "ada@uni.edu").issuer("atrium"));
        assert!(provider.login(&good).is_ok());

        let bad = create_test_token(TokenSpec::new("u-1", "ada@uni.edu").issuer("someone-else"));
        assert!(matches!(provider.login(&bad), Err(AuthError::InvalidClaims(_))));
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_notifies() {
        let provider = JwtIdentityProvider::new(TEST_SECRET);
        let mut rx = provider.subscribe();

        let token = create_test_token(TokenSpec::new("u-1", "ada@uni.edu"));
        provider.login(&token).unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_some());

        provider.logout();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
        assert!(provider.current_principal().is_none());
        assert!(matches!(
            provider.id_token_claims().await,
            Err(AuthError::MissingToken)
        ));
    }

    #[tokio::test]
    async fn test_claims_without_login() {
        let provider = JwtIdentityProvider::new(TEST_SECRET);
        assert!(matches!(
            provider.id_token_claims().await,
            Err(AuthError::MissingToken)
        ));
    }
}
