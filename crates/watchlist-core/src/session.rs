use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use watchlist_models::{CatalogId, DisplayItem, SeasonBasket, WatchlistEntry};

use crate::aggregate::aggregate;
use crate::store::{EntryStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("watchlist session needs a running tokio runtime")]
    NoRuntime,
    #[error("store writer task has stopped")]
    WriterStopped,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A write-back that was queued but not awaited
///
/// Dropping this does not cancel the write.
#[derive(Debug)]
pub struct PendingWrite {
    done: oneshot::Receiver<Result<(), StoreError>>,
}

impl PendingWrite {
    pub async fn wait(self) -> Result<(), StoreError> {
        match self.done.await {
            Ok(result) => result,
            Err(_) => Err(StoreError::TaskFailed(
                "store writer stopped before the write finished".to_string(),
            )),
        }
    }
}

enum StoreRequest {
    Replace {
        entries: Vec<WatchlistEntry>,
        done: oneshot::Sender<Result<(), StoreError>>,
    },
    Read {
        done: oneshot::Sender<Result<Vec<WatchlistEntry>, StoreError>>,
    },
}

/// Applies store requests one at a time, in the order they were queued
///
/// Runs until every sender is gone and the queue is drained.
async fn run_store_writer(store: Arc<dyn EntryStore>, mut requests: mpsc::UnboundedReceiver<StoreRequest>) {
    while let Some(request) = requests.recv().await {
        match request {
            StoreRequest::Replace { entries, done } => {
                let result = store.replace(&entries).await;
                match &result {
                    Ok(()) => debug!(
                        "Watchlist write-back to {} store succeeded ({} entries)",
                        store.store_name(),
                        entries.len()
                    ),
                    Err(e) => warn!(
                        "Watchlist write-back to {} store failed, local changes kept: {}",
                        store.store_name(),
                        e
                    ),
                }
                // Nobody may be waiting
                let _ = done.send(result);
            }
            StoreRequest::Read { done } => {
                let _ = done.send(store.read().await);
            }
        }
    }
    debug!("Store writer for {} store stopped", store.store_name());
}

/// What happened to the open basket during a removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasketState {
    /// No basket open, or the removed entry was not in it
    Untouched,
    Updated { remaining: usize },
    /// The last episode went, so the basket was closed
    Closed,
}

#[derive(Debug)]
pub enum RemoveOutcome {
    /// No entry had that id; nothing changed and nothing was written
    NotFound,
    Removed {
        write: PendingWrite,
        basket: BasketState,
    },
}

impl RemoveOutcome {
    pub fn basket_state(&self) -> Option<BasketState> {
        match self {
            RemoveOutcome::NotFound => None,
            RemoveOutcome::Removed { basket, .. } => Some(*basket),
        }
    }

    /// The pending write, if a write was started
    pub fn into_write(self) -> Option<PendingWrite> {
        match self {
            RemoveOutcome::NotFound => None,
            RemoveOutcome::Removed { write, .. } => Some(write),
        }
    }
}

/// One user's watch list as seen by a single view
///
/// Owns the flat entry list and the currently open basket. Removals update
/// both in memory first and then queue the whole list for the session's
/// store writer task, which applies snapshots strictly in removal order.
/// That write is never awaited here and a failed write is not rolled back:
/// the local list stays as the user left it, which can drift from the store
/// until the next successful write.
pub struct WatchlistSession {
    store: Arc<dyn EntryStore>,
    requests: mpsc::UnboundedSender<StoreRequest>,
    entries: Vec<WatchlistEntry>,
    open_basket: Option<SeasonBasket>,
}

impl std::fmt::Debug for WatchlistSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchlistSession")
            .field("store", &self.store.store_name())
            .field("entries", &self.entries.len())
            .field("open_basket", &self.open_basket)
            .finish()
    }
}

impl WatchlistSession {
    /// Must be called from inside a tokio runtime, which runs the store writer
    pub fn new(store: Arc<dyn EntryStore>, entries: Vec<WatchlistEntry>) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let (requests, receiver) = mpsc::unbounded_channel();
        runtime.spawn(run_store_writer(Arc::clone(&store), receiver));
        Ok(Self {
            store,
            requests,
            entries,
            open_basket: None,
        })
    }

    /// Read the store once and start a session over its contents
    pub async fn load(store: Arc<dyn EntryStore>) -> Result<Self, SessionError> {
        let entries = store.read().await?;
        info!(
            "Loaded watchlist session from {} store ({} entries)",
            store.store_name(),
            entries.len()
        );
        Self::new(store, entries)
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    /// Fresh aggregation of the current entries
    pub fn items(&self) -> Vec<DisplayItem> {
        aggregate(&self.entries)
    }

    pub fn open_basket(&self) -> Option<&SeasonBasket> {
        self.open_basket.as_ref()
    }

    pub fn open(&mut self, basket: SeasonBasket) {
        debug!(
            "Opening basket {} season {} ({} episodes)",
            basket.series_id(),
            basket.season_number(),
            basket.episode_count()
        );
        self.open_basket = Some(basket);
    }

    /// Find the basket for a series and season in the current view and open it
    pub fn open_season(&mut self, series_id: &CatalogId, season_number: u32) -> Option<&SeasonBasket> {
        let basket = self
            .items()
            .into_iter()
            .filter_map(|item| match item {
                DisplayItem::Basket(basket) => Some(basket),
                DisplayItem::Series(_) => None,
            })
            .find(|basket| basket.matches(series_id, season_number))?;
        self.open(basket);
        self.open_basket.as_ref()
    }

    pub fn close(&mut self) {
        self.open_basket = None;
    }

    /// Remove an entry by exact id from the list and from the open basket
    pub fn remove_episode(&mut self, entry_id: &CatalogId) -> RemoveOutcome {
        let before = self.entries.len();
        self.entries.retain(|entry| &entry.id != entry_id);
        if self.entries.len() == before {
            debug!("remove_episode: no entry with id {}", entry_id);
            return RemoveOutcome::NotFound;
        }

        let write = self.queue_write_back();
        let basket = self.remove_from_open_basket(entry_id);

        info!(
            "Removed watchlist entry {} ({} entries left, basket {:?})",
            entry_id,
            self.entries.len(),
            basket
        );
        RemoveOutcome::Removed { write, basket }
    }

    /// Re-read the store, keeping the open basket only if it still exists
    ///
    /// The read is queued behind any pending write-backs.
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let (done, receiver) = oneshot::channel();
        self.requests
            .send(StoreRequest::Read { done })
            .map_err(|_| SessionError::WriterStopped)?;
        self.entries = receiver.await.map_err(|_| SessionError::WriterStopped)??;
        if let Some(open) = self.open_basket.take() {
            let series_id = open.series_id().clone();
            if self.open_season(&series_id, open.season_number()).is_none() {
                debug!("Open basket {} season {} is gone after refresh", series_id, open.season_number());
            }
        }
        Ok(())
    }

    fn queue_write_back(&self) -> PendingWrite {
        let (done, receiver) = oneshot::channel();
        let request = StoreRequest::Replace {
            entries: self.entries.clone(),
            done,
        };
        if self.requests.send(request).is_err() {
            // The dropped request closes `receiver`, so waiters see a failure
            warn!(
                "Store writer for {} store is gone; write-back of {} entries dropped",
                self.store.store_name(),
                self.entries.len()
            );
        }
        PendingWrite { done: receiver }
    }

    fn remove_from_open_basket(&mut self, entry_id: &CatalogId) -> BasketState {
        match self.open_basket.take() {
            Some(basket) if basket.contains(entry_id) => match basket.without_episode(entry_id) {
                Some(basket) => {
                    let remaining = basket.episode_count();
                    self.open_basket = Some(basket);
                    BasketState::Updated { remaining }
                }
                None => BasketState::Closed,
            },
            untouched => {
                self.open_basket = untouched;
                BasketState::Untouched
            }
        }
    }
}
