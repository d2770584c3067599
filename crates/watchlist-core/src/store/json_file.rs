use async_trait::async_trait;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use watchlist_config::{Config, PathManager};
use watchlist_models::WatchlistEntry;

use super::{EntryStore, StoreError};

/// Field of the user document that holds the watch list
const WATCHLIST_FIELD: &str = "watchlist";

/// One JSON user document per user, `{ "watchlist": [...], ...profile }`
///
/// Writes only touch the `watchlist` field; the rest of the document is
/// carried over as-is. Clones share one write lock, so each read-modify-write
/// of the document runs alone.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(store_dir: &Path, user: &str) -> Self {
        Self {
            path: store_dir.join(format!("{}.json", user)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn from_config(config: &Config, path_manager: &PathManager) -> Self {
        Self::new(&config.store_dir(path_manager.data_dir()), &config.store.user)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, reason: impl ToString) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn document_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    async fn load_document(&self) -> Result<Option<Map<String, Value>>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("User document {:?} does not exist", self.path);
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => Ok(Some(document)),
            Ok(_) => Err(self.corrupt("document root is not an object")),
            Err(e) => {
                warn!("User document {:?} is not valid JSON: {}", self.path, e);
                Err(self.corrupt(e))
            }
        }
    }
}

#[async_trait]
impl EntryStore for JsonFileStore {
    fn store_name(&self) -> &str {
        "json-file"
    }

    async fn read(&self) -> Result<Vec<WatchlistEntry>, StoreError> {
        let Some(mut document) = self.load_document().await? else {
            return Ok(Vec::new());
        };

        let entries = match document.remove(WATCHLIST_FIELD) {
            None | Some(Value::Null) => Vec::new(),
            Some(list) => serde_json::from_value::<Vec<WatchlistEntry>>(list)
                .map_err(|e| self.corrupt(format!("invalid watchlist field: {}", e)))?,
        };

        info!("Loaded {} watchlist entries from {:?}", entries.len(), self.path);
        Ok(entries)
    }

    async fn replace(&self, entries: &[WatchlistEntry]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load_document().await?.unwrap_or_default();
        document.insert(WATCHLIST_FIELD.to_string(), serde_json::to_value(entries)?);
        let json = serde_json::to_string_pretty(&Value::Object(document))?;

        let dir = self.document_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| self.io_error(e))?;

        // Fresh temp file next to the target, renamed over it once complete
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(json.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
        .map_err(|e| self.io_error(e))?;

        debug!("Saved {} watchlist entries to {:?}", entries.len(), self.path);
        Ok(())
    }
}
