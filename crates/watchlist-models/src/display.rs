use serde::Serialize;

use crate::catalog_id::CatalogId;
use crate::watchlist::WatchlistEntry;

/// Output keys owned by the display item itself
const RESERVED_KEYS: [&str; 2] = ["type", "isSeason"];

/// One element of the aggregated watch list, in display order
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DisplayItem {
    Series(SeriesDisplayItem),
    Basket(SeasonBasket),
}

impl DisplayItem {
    pub fn as_basket(&self) -> Option<&SeasonBasket> {
        match self {
            DisplayItem::Basket(basket) => Some(basket),
            DisplayItem::Series(_) => None,
        }
    }

    pub fn as_series(&self) -> Option<&SeriesDisplayItem> {
        match self {
            DisplayItem::Series(item) => Some(item),
            DisplayItem::Basket(_) => None,
        }
    }

    pub fn series_id(&self) -> &CatalogId {
        match self {
            DisplayItem::Series(item) => item.series_key(),
            DisplayItem::Basket(basket) => basket.series_id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DisplayItem::Series(item) => item.entry.display_name(),
            DisplayItem::Basket(basket) => basket.name(),
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            DisplayItem::Series(item) => item.entry.poster_path.as_deref(),
            DisplayItem::Basket(basket) => basket.poster_path(),
        }
    }
}

/// A whole-series or whole-season entry passed through for display
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesDisplayItem {
    #[serde(flatten)]
    pub entry: WatchlistEntry,
    #[serde(rename = "isSeason")]
    pub is_season: bool,
}

impl SeriesDisplayItem {
    pub fn from_entry(entry: &WatchlistEntry) -> Self {
        let mut entry = entry.clone();
        for key in RESERVED_KEYS {
            entry.extra.remove(key);
        }
        let is_season = entry.season().is_some();
        Self { entry, is_season }
    }

    pub fn series_key(&self) -> &CatalogId {
        self.entry.series_key()
    }
}

/// All episode entries of one season of one series
///
/// A basket always holds at least one episode, sorted by episode number,
/// and `episode_count` always equals `episodes.len()`. Both are enforced by
/// keeping the fields private.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonBasket {
    series_id: CatalogId,
    season_number: u32,
    name: String,
    #[serde(rename = "poster_path", skip_serializing_if = "Option::is_none")]
    poster_path: Option<String>,
    episodes: Vec<WatchlistEntry>,
    episode_count: usize,
}

impl SeasonBasket {
    /// Build a basket from episodes already in display order.
    /// Returns `None` for an empty episode list.
    pub fn new(
        series_id: CatalogId,
        season_number: u32,
        name: String,
        poster_path: Option<String>,
        episodes: Vec<WatchlistEntry>,
    ) -> Option<Self> {
        if episodes.is_empty() {
            return None;
        }
        let episode_count = episodes.len();
        Some(Self {
            series_id,
            season_number,
            name,
            poster_path,
            episodes,
            episode_count,
        })
    }

    pub fn series_id(&self) -> &CatalogId {
        &self.series_id
    }

    pub fn season_number(&self) -> u32 {
        self.season_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.poster_path.as_deref()
    }

    pub fn episodes(&self) -> &[WatchlistEntry] {
        &self.episodes
    }

    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn contains(&self, entry_id: &CatalogId) -> bool {
        self.episodes.iter().any(|episode| &episode.id == entry_id)
    }

    /// Same series and season, using the grouping form of the series id
    pub fn matches(&self, series_id: &CatalogId, season_number: u32) -> bool {
        self.season_number == season_number && self.series_id.group_key() == series_id.group_key()
    }

    /// Drop every episode with `entry_id`. An emptied basket ceases to exist.
    pub fn without_episode(mut self, entry_id: &CatalogId) -> Option<Self> {
        self.episodes.retain(|episode| &episode.id != entry_id);
        self.episode_count = self.episodes.len();
        if self.episodes.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
