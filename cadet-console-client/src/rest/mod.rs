//! JSON-over-HTTP implementation of [`ResourceClient`](crate::ResourceClient)

mod envelope;
mod http;
mod provider;

use std::sync::Arc;

use reqwest::Client;

use crate::error::Result;
use crate::http_client::{HttpTimeouts, create_http_client};
use crate::traits::{StatusErrorMapper, TokenSource};
use crate::types::ResourceEndpoint;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// REST client for one resource kind.
pub struct RestResourceClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
    pub(crate) endpoint: ResourceEndpoint,
    pub(crate) tokens: Arc<dyn TokenSource>,
}

impl RestResourceClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(
        base_url: &str,
        endpoint: ResourceEndpoint,
        tokens: Arc<dyn TokenSource>,
        timeouts: HttpTimeouts,
    ) -> Result<Self> {
        Ok(Self::with_client(
            create_http_client(timeouts)?,
            base_url,
            endpoint,
            tokens,
        ))
    }

    /// Create a client sharing an existing HTTP client.
    pub fn with_client(
        client: Client,
        base_url: &str,
        endpoint: ResourceEndpoint,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoint,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL.
    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

impl StatusErrorMapper for RestResourceClient {
    fn resource_key(&self) -> &str {
        &self.endpoint.resource
    }
}
