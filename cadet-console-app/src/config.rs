//! Console configuration
//!
//! Resolution order, later wins:
//! 1. built-in defaults
//! 2. `config.toml` under the platform config dir (`cadet-console/`), if present
//!    (or the file passed explicitly, which replaces it)
//! 3. the `CADET_CONSOLE_BASE_URL` environment variable

use std::path::{Path, PathBuf};
use std::time::Duration;

use cadet_console_client::{
    HttpTimeouts, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    MAX_PAGE_SIZE,
};
use cadet_console_core::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

pub const APP_DIR_NAME: &str = "cadet-console";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const BASE_URL_ENV: &str = "CADET_CONSOLE_BASE_URL";
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Backend root, without trailing slash.
    pub base_url: String,
    pub page_size: u32,
    /// How long a notification stays visible.
    pub notification_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Where the access token is kept. Defaults to the local data dir.
    pub token_file: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: cadet_console_core::services::DEFAULT_PAGE_SIZE,
            notification_ms: 3000,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            token_file: None,
        }
    }
}

impl ConsoleConfig {
    /// `config.toml` under the platform config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn from_toml_str(raw: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|e| CoreError::ConfigError(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub async fn from_file(path: &Path) -> CoreResult<Self> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| {
            CoreError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(CoreError::ConfigError(format!(
                "Config file too large: {} bytes (max: {MAX_CONFIG_FILE_SIZE} bytes)",
                metadata.len()
            )));
        }
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            CoreError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Resolve the configuration. An explicit path must exist; the default
    /// location is optional.
    pub async fn load(explicit: Option<&Path>) -> CoreResult<Self> {
        let config = match explicit {
            Some(path) => {
                log::debug!("Loading config from {}", path.display());
                Self::from_file(path).await?
            }
            None => match Self::default_path() {
                Some(path) if tokio::fs::try_exists(&path).await.unwrap_or(false) => {
                    log::debug!("Loading config from {}", path.display());
                    Self::from_file(&path).await?
                }
                _ => Self::default(),
            },
        };
        let config = config.with_base_url_override(std::env::var(BASE_URL_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply the environment override, ignoring blank values.
    #[must_use]
    pub fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            log::debug!("Base URL overridden by {BASE_URL_ENV}");
            self.base_url = url.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> CoreResult<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            CoreError::ConfigError(format!("Invalid base_url '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CoreError::ConfigError(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(CoreError::ConfigError(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if self.connect_timeout_secs == 0 || self.request_timeout_secs == 0 {
            return Err(CoreError::ConfigError(
                "connect_timeout_secs and request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeouts(&self) -> HttpTimeouts {
        HttpTimeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        assert_eq!(ConsoleConfig::from_toml_str("").unwrap(), ConsoleConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = ConsoleConfig::from_toml_str(
            "base_url = \"https://ncc.example.org/api\"\npage_size = 25\n",
        )
        .unwrap();
        assert_eq!(config.base_url, "https://ncc.example.org/api");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.notification_ms, 3000);
        assert_eq!(config.timeouts().request, Duration::from_secs(30));
    }

    #[test]
    fn rejects_bad_values() {
        for raw in [
            "base_url = \"ftp://x\"",
            "base_url = \"not a url\"",
            "page_size = 0",
            "page_size = 101",
            "connect_timeout_secs = 0",
            "request_timeout_secs = 0",
            "unknown_key = 1",
            "page_size = \"ten\"",
        ] {
            assert!(
                matches!(ConsoleConfig::from_toml_str(raw), Err(CoreError::ConfigError(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn env_override_wins_unless_blank() {
        let config = ConsoleConfig::default()
            .with_base_url_override(Some(" http://10.0.0.5:8000 ".to_string()));
        assert_eq!(config.base_url, "http://10.0.0.5:8000");
        let config = config.with_base_url_override(Some("  ".to_string()));
        assert_eq!(config.base_url, "http://10.0.0.5:8000");
    }

    #[tokio::test]
    async fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("console.toml");
        tokio::fs::write(&path, "notification_ms = 1500\n").await.unwrap();
        let config = ConsoleConfig::from_file(&path).await.unwrap();
        assert_eq!(config.notification_duration(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            ConsoleConfig::load(Some(&missing)).await,
            Err(CoreError::ConfigError(_))
        ));
    }
}
