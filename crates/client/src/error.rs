//! Client error types

use thiserror::Error;

/// Result type for backend client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur talking to the portal backend
#[derive(Debug, Error)]
pub enum ClientError {
    /// No bearer token was available for the request
    #[error("no access token available")]
    MissingToken,

    /// Backend rejected the credentials (401/403)
    #[error("backend rejected credentials (status {0})")]
    Unauthorized(u16),

    /// Backend returned a non-success status
    #[error("backend error (status {0})")]
    Server(u16),

    /// Network-level failure (connect, timeout, TLS)
    #[error("network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The configured base URL is malformed
    #[error("invalid base url '{0}'")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// Create a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Map an HTTP status to the right error variant
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(status),
            s => Self::Server(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(ClientError::from_status(401), ClientError::Unauthorized(401)));
        assert!(matches!(ClientError::from_status(403), ClientError::Unauthorized(403)));
        assert!(matches!(ClientError::from_status(500), ClientError::Server(500)));
        assert!(matches!(ClientError::from_status(404), ClientError::Server(404)));
    }

    #[test]
    fn test_display_messages() {
        assert!(ClientError::network("connection refused")
            .to_string()
            .contains("connection refused"));
        assert!(ClientError::Unauthorized(401).to_string().contains("401"));
    }
}
