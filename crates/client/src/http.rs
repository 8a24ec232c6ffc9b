//! HTTP role authority
//!
//! `reqwest`-backed implementation of [`RoleAuthority`] against the portal
//! REST API. The bearer token is pulled from a [`TokenSource`] on every
//! request so a refreshed token is picked up without rebuilding the client.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use atrium_config::ApiConfig;

use crate::authority::RoleAuthority;
use crate::error::{ClientError, Result};
use crate::types::{PermissionsResponse, UserResponse};

/// Supplies the current access token for outgoing requests
///
/// Implemented for closures, so an identity provider can be wired in with
/// `move || provider.current_token()`.
pub trait TokenSource: Send + Sync {
    /// The current bearer token, if one is held
    fn access_token(&self) -> Option<String>;
}

impl<F> TokenSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn access_token(&self) -> Option<String> {
        self()
    }
}

/// Role authority over the portal REST API
///
/// # Example
///
/// ```ignore
/// let config = ApiConfig::default();
/// let authority = HttpRoleAuthority::from_config(&config, Arc::new(move || token.clone()))?;
/// let user = authority.fetch_role().await?;
/// ```
pub struct HttpRoleAuthority {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl HttpRoleAuthority {
    /// Create an authority for the given base URL
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if the URL is empty or has no
    /// scheme.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    /// Create an authority from the `[api]` config section
    ///
    /// Applies the configured request timeout.
    pub fn from_config(config: &ApiConfig, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let base_url = normalize_base_url(config.url.clone())?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    /// Perform an authenticated GET and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self
            .tokens
            .access_token()
            .ok_or(ClientError::MissingToken)?;

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "backend request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ClientError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "backend request failed");
            return Err(ClientError::from_status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::decode(e.to_string()))
    }
}

#[async_trait]
impl RoleAuthority for HttpRoleAuthority {
    async fn fetch_role(&self) -> Result<UserResponse> {
        self.get_json("/users/me").await
    }

    async fn fetch_permissions(&self) -> Result<PermissionsResponse> {
        self.get_json("/users/permissions/me").await
    }
}

/// Validate the base URL and strip a trailing slash
fn normalize_base_url(url: String) -> Result<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() || !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ClientError::InvalidBaseUrl(url));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
