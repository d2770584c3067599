use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use watchlist_models::WatchlistEntry;

use super::{EntryStore, StoreError};

/// In-process store, for embedding and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<WatchlistEntry>>,
    reject_writes: bool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new(entries: Vec<WatchlistEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            reject_writes: false,
            writes: AtomicUsize::new(0),
        }
    }

    /// A store whose every `replace` fails, leaving its contents untouched
    pub fn rejecting(entries: Vec<WatchlistEntry>) -> Self {
        Self {
            reject_writes: true,
            ..Self::new(entries)
        }
    }

    pub async fn snapshot(&self) -> Vec<WatchlistEntry> {
        self.entries.lock().await.clone()
    }

    /// Number of `replace` calls seen, successful or not
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EntryStore for MemoryStore {
    fn store_name(&self) -> &str {
        "memory"
    }

    async fn read(&self) -> Result<Vec<WatchlistEntry>, StoreError> {
        Ok(self.snapshot().await)
    }

    async fn replace(&self, entries: &[WatchlistEntry]) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes {
            return Err(StoreError::Rejected("memory store is read-only".to_string()));
        }
        *self.entries.lock().await = entries.to_vec();
        Ok(())
    }
}
