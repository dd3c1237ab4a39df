//! Persisted access token abstraction

use std::sync::Arc;

use async_trait::async_trait;
use cadet_console_client::{log_sanitizer::mask_token, TokenSource};
use tokio::sync::RwLock;

use crate::error::CoreResult;

/// Persistent home of the bearer token.
///
/// Platform implementations:
/// - CLI: `FileTokenStore` (JSON file under the local data dir)
/// - Tests: [`InMemoryTokenStore`]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// `Ok(None)` when no token has been saved.
    async fn load(&self) -> CoreResult<Option<String>>;

    async fn save(&self, token: &str) -> CoreResult<()>;

    /// Removing an absent token is not an error.
    async fn clear(&self) -> CoreResult<()>;
}

/// Volatile store, lost with the process.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> CoreResult<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> CoreResult<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Reads the token from a [`TokenStore`] on every request.
///
/// A store failure is logged and the request goes out unauthenticated.
#[derive(Clone)]
pub struct StoredToken(Arc<dyn TokenStore>);

impl StoredToken {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self(store)
    }
}

#[async_trait]
impl TokenSource for StoredToken {
    async fn bearer_token(&self) -> Option<String> {
        match self.0.load().await {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                log::warn!("Failed to load access token: {e}");
                None
            }
        }
    }
}

impl std::fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StoredToken")
    }
}

/// Masked form for logs and `token show`.
pub fn describe_token(token: Option<&str>) -> String {
    token.map_or_else(|| "(none)".to_string(), mask_token)
}
