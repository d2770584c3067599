pub mod catalog_id;
pub mod display;
pub mod watchlist;

pub use catalog_id::CatalogId;
pub use display::{DisplayItem, SeasonBasket, SeriesDisplayItem};
pub use watchlist::{EntryScope, WatchlistEntry};
