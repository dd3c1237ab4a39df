//! Platform-agnostic application bootstrap for the cadet console.
//!
//! Provides `AppState` (controller container), `AppStateBuilder` (adapter
//! injection) and `ConsoleConfig` (TOML configuration).

pub mod adapters;
pub mod config;

use std::sync::Arc;

use cadet_console_client::{ResourceClient, RestResourceClient, TokenSource};
use cadet_console_core::error::CoreResult;
use cadet_console_core::services::{ControllerContext, ResourceController};
use cadet_console_core::state::Notifier;
use cadet_console_core::traits::{StoredToken, TokenStore};
use cadet_console_core::{cadet_schema, school_schema, ResourceSchema};

pub use adapters::FileTokenStore;
pub use config::ConsoleConfig;

/// Resource kinds managed by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Schools,
    Cadets,
}

impl ResourceKind {
    pub const ALL: [Self; 2] = [Self::Schools, Self::Cadets];

    pub fn schema(self) -> CoreResult<ResourceSchema> {
        match self {
            Self::Schools => school_schema(),
            Self::Cadets => cadet_schema(),
        }
    }
}

/// Platform-agnostic application state.
///
/// Every front end constructs this once at startup via `AppStateBuilder`.
pub struct AppState {
    pub config: ConsoleConfig,
    /// Shared by all controllers, so one notification is visible at a time.
    pub notifier: Arc<Notifier>,
    pub token_store: Arc<dyn TokenStore>,
    pub schools: Arc<ResourceController>,
    pub cadets: Arc<ResourceController>,
}

impl AppState {
    pub fn controller(&self, kind: ResourceKind) -> &Arc<ResourceController> {
        match kind {
            ResourceKind::Schools => &self.schools,
            ResourceKind::Cadets => &self.cadets,
        }
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Optional
/// - `config`: defaults to `ConsoleConfig::default()`
/// - `token_store`: defaults to `FileTokenStore` at the configured or default path
/// - `resource_client`: per resource, defaults to `RestResourceClient`
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ConsoleConfig>,
    token_store: Option<Arc<dyn TokenStore>>,
    clients: Vec<(ResourceKind, Arc<dyn ResourceClient>)>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: ConsoleConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    #[must_use]
    pub fn resource_client(mut self, kind: ResourceKind, client: Arc<dyn ResourceClient>) -> Self {
        self.clients.retain(|(k, _)| *k != kind);
        self.clients.push((kind, client));
        self
    }

    /// Build `AppState`.
    pub fn build(self) -> CoreResult<AppState> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let token_store: Arc<dyn TokenStore> = match self.token_store {
            Some(store) => store,
            None => {
                let path = match &config.token_file {
                    Some(path) => path.clone(),
                    None => FileTokenStore::default_path()?,
                };
                Arc::new(FileTokenStore::new(path))
            }
        };
        let tokens: Arc<dyn TokenSource> = Arc::new(StoredToken::new(token_store.clone()));
        let notifier = Arc::new(Notifier::new(config.notification_duration()));

        let controller = |kind: ResourceKind| -> CoreResult<Arc<ResourceController>> {
            let schema = kind.schema()?;
            let client: Arc<dyn ResourceClient> =
                match self.clients.iter().find(|(k, _)| *k == kind) {
                    Some((_, client)) => client.clone(),
                    None => Arc::new(RestResourceClient::new(
                        &config.base_url,
                        schema.endpoint.clone(),
                        tokens.clone(),
                        config.timeouts(),
                    )?),
                };
            let ctx = ControllerContext::new(client, Arc::new(schema), notifier.clone())
                .with_page_size(config.page_size);
            Ok(Arc::new(ResourceController::new(Arc::new(ctx))?))
        };

        let schools = controller(ResourceKind::Schools)?;
        let cadets = controller(ResourceKind::Cadets)?;
        log::info!(
            "Console ready: {} ({} per page)",
            config.base_url,
            config.page_size
        );

        Ok(AppState {
            config,
            notifier,
            token_store,
            schools,
            cadets,
        })
    }
}
