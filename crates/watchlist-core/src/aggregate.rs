// Aggregation of the flat watch list into display items

use std::collections::HashMap;
use tracing::debug;
use watchlist_models::{CatalogId, DisplayItem, EntryScope, SeasonBasket, SeriesDisplayItem, WatchlistEntry};

/// Separates the series name from the episode part of a stored episode name
///
/// Episode entries are written as `"<series> - S<s>E<e>: <title>"` and carry
/// no structured series-name field, so basket names are recovered by
/// splitting on this delimiter. Series names that themselves contain
/// `" - "` are truncated; stored data depends on this exact rule.
pub const NAME_DELIMITER: &str = " - ";

/// Grouping key of a season basket
///
/// The series half is the rendered id, so numeric and string forms of the
/// same series id share a basket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BasketKey {
    series: String,
    season: u32,
}

impl BasketKey {
    pub fn new(series_id: &CatalogId, season: u32) -> Self {
        Self {
            series: series_id.group_key(),
            season,
        }
    }

    /// Key for any entry that names a season
    pub fn for_entry(entry: &WatchlistEntry) -> Option<Self> {
        entry
            .season()
            .map(|season| Self::new(entry.series_key(), season))
    }
}

struct BasketBuilder<'a> {
    series_id: CatalogId,
    season_number: u32,
    /// First non-empty season poster seen among the episodes
    season_poster: Option<String>,
    episodes: Vec<&'a WatchlistEntry>,
}

/// Baskets in first-seen order, with a key lookup
#[derive(Default)]
struct BasketIndex<'a> {
    builders: Vec<BasketBuilder<'a>>,
    by_key: HashMap<BasketKey, usize>,
}

impl<'a> BasketIndex<'a> {
    fn push(&mut self, key: BasketKey, entry: &'a WatchlistEntry, season_number: u32) {
        let slot = match self.by_key.get(&key) {
            Some(&slot) => slot,
            None => {
                self.builders.push(BasketBuilder {
                    series_id: entry.series_key().clone(),
                    season_number,
                    season_poster: None,
                    episodes: Vec::new(),
                });
                self.by_key.insert(key, self.builders.len() - 1);
                self.builders.len() - 1
            }
        };

        let builder = &mut self.builders[slot];
        builder.episodes.push(entry);
        if builder.season_poster.is_none() {
            builder.season_poster = entry
                .season_poster
                .as_ref()
                .filter(|poster| !poster.is_empty())
                .cloned();
        }
    }

    fn contains(&self, key: &BasketKey) -> bool {
        self.by_key.contains_key(key)
    }
}

/// Turn the flat watch list into display items
///
/// Output order: pass-through series and season items in input order, then
/// season baskets in the order their key was first seen. Never fails; a
/// missing name reads as empty and a missing series id falls back to the
/// entry id.
pub fn aggregate(entries: &[WatchlistEntry]) -> Vec<DisplayItem> {
    // Baskets must be complete before the pass-through pass consults them.
    let index = collect_baskets(entries);
    let (mut items, deduplicated) = pass_through(entries, &index);

    let pass_through_count = items.len();
    let basket_count = index.builders.len();
    items.extend(
        index
            .builders
            .into_iter()
            .filter_map(finalize_basket)
            .map(DisplayItem::Basket),
    );

    debug!(
        "aggregate: entries={}, pass_through={}, baskets={}, deduplicated_seasons={}",
        entries.len(),
        pass_through_count,
        basket_count,
        deduplicated
    );

    items
}

/// First pass: group every episode-level entry by series and season
fn collect_baskets(entries: &[WatchlistEntry]) -> BasketIndex<'_> {
    let mut index = BasketIndex::default();
    for entry in entries {
        if entry.scope() != EntryScope::Episode {
            continue;
        }
        if let (Some(season), Some(key)) = (entry.season(), BasketKey::for_entry(entry)) {
            index.push(key, entry, season);
        }
    }
    index
}

/// Second pass: emit series and season entries, dropping seasons a basket covers
fn pass_through(entries: &[WatchlistEntry], index: &BasketIndex<'_>) -> (Vec<DisplayItem>, usize) {
    let mut items = Vec::new();
    let mut deduplicated = 0;

    for entry in entries {
        if entry.scope() == EntryScope::Episode {
            continue;
        }
        if let Some(key) = BasketKey::for_entry(entry) {
            if index.contains(&key) {
                deduplicated += 1;
                continue;
            }
        }
        items.push(DisplayItem::Series(SeriesDisplayItem::from_entry(entry)));
    }

    (items, deduplicated)
}

fn finalize_basket(builder: BasketBuilder<'_>) -> Option<SeasonBasket> {
    let mut episodes: Vec<WatchlistEntry> = builder.episodes.into_iter().cloned().collect();
    // Stable: duplicate episode numbers keep their input order
    episodes.sort_by_key(|episode| episode.episode());

    let first = episodes.first()?;
    let poster_path = builder
        .season_poster
        .or_else(|| first.poster_path.clone());
    let name = basket_name(first.display_name(), builder.season_number);

    SeasonBasket::new(builder.series_id, builder.season_number, name, poster_path, episodes)
}

/// Series part of a stored name: everything before the first delimiter
pub fn series_name(name: &str) -> &str {
    name.split(NAME_DELIMITER).next().unwrap_or(name)
}

pub fn basket_name(episode_name: &str, season_number: u32) -> String {
    format!("{} (Season {})", series_name(episode_name), season_number)
}

#[cfg(test)]
mod tests;
