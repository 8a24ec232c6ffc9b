//! Access error types
//!
//! Only `Unauthenticated` and backend failures ever reach callers - and
//! only from the permission snapshot fetch. Role resolution swallows every
//! source failure and terminates with a role; boolean permission checks
//! fail closed instead of erroring.

use thiserror::Error;

use atrium_client::ClientError;

/// Result type for access operations
pub type Result<T> = std::result::Result<T, AccessError>;

/// Errors that can occur during role and permission resolution
#[derive(Debug, Error)]
pub enum AccessError {
    /// No principal is signed in
    #[error("no authenticated principal")]
    Unauthenticated,

    /// A role/permission source failed or returned no usable mapping
    ///
    /// Recovered internally by falling through to the next source.
    #[error("source '{src}' unavailable: {message}")]
    SourceUnavailable {
        /// Which source failed ("backend", "claims", "cache")
        src: &'static str,
        /// What went wrong
        message: String,
    },

    /// A durable cache entry belongs to a different principal
    ///
    /// Recovered internally by discarding the entry.
    #[error("cached role belongs to a different principal")]
    CacheMismatch,

    /// The backend rejected or failed the permission fetch
    #[error(transparent)]
    Backend(#[from] ClientError),

    /// The durable role store failed
    #[error("role store error: {0}")]
    Store(String),
}

impl AccessError {
    /// Create a SourceUnavailable error
    pub fn source_unavailable(source: &'static str, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            src: source,
            message: message.into(),
        }
    }

    /// Create a Store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable() {
        let err = AccessError::source_unavailable("backend", "connection refused");
        assert!(err.to_string().contains("backend"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_backend_error_passes_through() {
        let err = AccessError::from(ClientError::Unauthorized(401));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_store_error() {
        let err = AccessError::store("disk full");
        assert!(err.to_string().contains("disk full"));
    }
}
