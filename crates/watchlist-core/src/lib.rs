pub mod aggregate;
pub mod poster;
pub mod session;
pub mod store;

pub use aggregate::{aggregate, basket_name, series_name, BasketKey, NAME_DELIMITER};
pub use poster::{ImageResolver, ImageSize};
pub use session::{BasketState, PendingWrite, RemoveOutcome, SessionError, WatchlistSession};
pub use store::{EntryStore, JsonFileStore, MemoryStore, StoreError};
