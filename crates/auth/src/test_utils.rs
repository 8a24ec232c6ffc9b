//! Test utilities for generating identity tokens
//!
//! These helpers create valid signed JWTs for testing resolution flows.
//! Use these instead of mocking - they exercise the real validation path.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::claims::IdTokenClaims;

/// Test secret for JWT signing (32 bytes for HS256)
pub const TEST_SECRET: &[u8] = b"test-secret-key-32-bytes-long!!!";

/// Specification for a test token
///
/// # Example
///
/// ```
/// use atrium_auth::test_utils::{TokenSpec, create_test_token, TEST_SECRET};
/// use atrium_auth::JwtIdentityProvider;
///
/// let token = create_test_token(TokenSpec::new("u-1", "ada@uni.edu").role("staff"));
/// let provider = JwtIdentityProvider::new(TEST_SECRET);
/// provider.login(&token).unwrap();
/// ```
pub struct TokenSpec {
    subject: String,
    email: String,
    role: Option<String>,
    issuer: Option<String>,
    secret: Vec<u8>,
    expires_in: Duration,
}

impl TokenSpec {
    /// Token for the given subject/email, valid for an hour, no role claim
    pub fn new(subject: &str, email: &str) -> Self {
        Self {
            subject: subject.to_string(),
            email: email.to_string(),
            role: None,
            issuer: None,
            secret: TEST_SECRET.to_vec(),
            expires_in: Duration::hours(1),
        }
    }

    /// Set the raw role claim
    pub fn role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    /// Set the issuer claim
    pub fn issuer(mut self, issuer: &str) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    /// Sign with a different secret
    pub fn secret(mut self, secret: &[u8]) -> Self {
        self.secret = secret.to_vec();
        self
    }

    /// Make the token already expired
    pub fn expired(mut self) -> Self {
        self.expires_in = Duration::hours(-1);
        self
    }
}

/// Encode a signed test token from a spec
pub fn create_test_token(spec: TokenSpec) -> String {
    let now = Utc::now();

    let claims = IdTokenClaims {
        subject: spec.subject,
        email: spec.email,
        name: None,
        role: spec.role,
        expires_at: (now + spec.expires_in).timestamp(),
        issued_at: now.timestamp(),
        not_before: None,
        issuer: spec.issuer,
        custom: Default::default(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(&spec.secret),
    )
    .expect("failed to encode test JWT")
}
