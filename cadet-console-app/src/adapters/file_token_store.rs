//! JSON file token store
//!
//! Keeps the bearer token in `{"access_token": "..."}` under the platform's
//! local data dir, the console counterpart of the browser's local storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cadet_console_core::error::{CoreError, CoreResult};
use cadet_console_core::traits::TokenStore;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::APP_DIR_NAME;

const STORE_FILE_NAME: &str = "token.json";
const MAX_STORE_FILE_SIZE: u64 = 64 * 1024; // 64KB

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    access_token: String,
}

pub struct FileTokenStore {
    path: PathBuf,
    /// `Some(..)` once the file has been read.
    cache: RwLock<Option<Option<String>>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        log::debug!("Token store path: {}", path.display());
        Self {
            path,
            cache: RwLock::new(None),
        }
    }

    /// - Linux: `~/.local/share/cadet-console/token.json`
    /// - macOS: `~/Library/Application Support/cadet-console/token.json`
    /// - Windows: `%LOCALAPPDATA%\cadet-console\token.json`
    pub fn default_path() -> CoreResult<PathBuf> {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(STORE_FILE_NAME))
            .ok_or_else(|| {
                CoreError::StorageError("Failed to determine local data directory".to_string())
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> CoreResult<Option<String>> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to check token file: {e}")))?;
        if !exists {
            return Ok(None);
        }

        let metadata = tokio::fs::metadata(&self.path).await.map_err(|e| {
            CoreError::StorageError(format!("Failed to read token file metadata: {e}"))
        })?;
        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Token file too large: {} bytes (max: {MAX_STORE_FILE_SIZE} bytes)",
                metadata.len()
            )));
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to read token file: {e}")))?;
        let file: TokenFile = serde_json::from_str(&content)
            .map_err(|e| CoreError::SerializationError(format!("Invalid token file: {e}")))?;
        Ok(Some(file.access_token).filter(|t| !t.is_empty()))
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> CoreResult<Option<String>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Ok(cached.clone());
        }
        let token = self.read_file().await?;
        *self.cache.write().await = Some(token.clone());
        Ok(token)
    }

    async fn save(&self, token: &str) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::StorageError(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        let body = serde_json::to_string_pretty(&TokenFile {
            access_token: token.to_string(),
        })
        .map_err(|e| CoreError::SerializationError(e.to_string()))?;

        // Write then rename so a crash never leaves a truncated file.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to write token file: {e}")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to write token file: {e}")))?;

        *self.cache.write().await = Some(Some(token.to_string()));
        log::info!("Access token saved");
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => log::info!("Access token cleared"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to remove token file: {e}"
                )))
            }
        }
        *self.cache.write().await = Some(None);
        Ok(())
    }
}
