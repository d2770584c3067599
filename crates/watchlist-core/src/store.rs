// Entry store boundary: read-whole and replace-whole of one user's watch list

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use watchlist_models::WatchlistEntry;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stored document {} is corrupt: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("failed to serialize watch list: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("store rejected the write: {0}")]
    Rejected(String),
    #[error("write-back task failed: {0}")]
    TaskFailed(String),
}

#[async_trait]
pub trait EntryStore: Send + Sync {
    fn store_name(&self) -> &str;

    /// The full, ordered watch list. A user with no list yet reads as empty.
    async fn read(&self) -> Result<Vec<WatchlistEntry>, StoreError>;

    /// Overwrite the whole watch list. Last writer wins.
    async fn replace(&self, entries: &[WatchlistEntry]) -> Result<(), StoreError>;
}
