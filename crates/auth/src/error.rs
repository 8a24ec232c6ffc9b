//! Authentication error types

use thiserror::Error;

/// Result type for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur during identity operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// No identity token is held (not logged in)
    #[error("missing identity token")]
    MissingToken,

    /// Token signature verification failed
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// Token is not yet valid (nbf claim)
    #[error("token not yet valid")]
    TokenNotYetValid,

    /// Token claims are malformed or fail validation
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    /// The identity provider could not produce claims
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

impl AuthError {
    /// Create an InvalidClaims error
    pub fn invalid_claims(message: impl Into<String>) -> Self {
        Self::InvalidClaims(message.into())
    }

    /// Create a ProviderUnavailable error
    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::ProviderUnavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_claims() {
        let err = AuthError::invalid_claims("missing sub");
        assert!(err.to_string().contains("missing sub"));
    }

    #[test]
    fn test_provider_unavailable() {
        let err = AuthError::provider_unavailable("token store offline");
        assert!(err.to_string().contains("token store offline"));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(AuthError::MissingToken.to_string(), "missing identity token");
        assert_eq!(AuthError::TokenExpired.to_string(), "token expired");
    }
}
