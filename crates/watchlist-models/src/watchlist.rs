use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::catalog_id::CatalogId;

/// One persisted watch-list record, as stored in the user document
///
/// Entries are flat: a whole series, a whole season and a single episode are
/// all stored side by side, distinguished only by which of `season_number`
/// and `episode_number` are set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub id: CatalogId,
    /// Parent series. Missing on series-level adds, where `id` is the series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<CatalogId>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub season_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<u32>,
    /// Episode entries are written as `"<series> - S<s>E<e>: <title>"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "poster_path", default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_poster: Option<String>,
    #[serde(rename = "still_path", default, skip_serializing_if = "Option::is_none")]
    pub still_path: Option<String>,
    /// Kept exactly as stored; see [`WatchlistEntry::added_at_utc`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<Value>,
    /// Any other stored fields, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Granularity of an entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryScope {
    Series,
    Season,
    Episode,
}

impl WatchlistEntry {
    /// Series-level entry with only an id and a name
    pub fn new(id: impl Into<CatalogId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            series_id: None,
            season_number: None,
            episode_number: None,
            name: Some(name.into()),
            poster_path: None,
            season_poster: None,
            still_path: None,
            added_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_series(mut self, series_id: impl Into<CatalogId>) -> Self {
        self.series_id = Some(series_id.into());
        self
    }

    pub fn with_season(mut self, season_number: u32) -> Self {
        self.season_number = Some(season_number);
        self
    }

    pub fn with_episode(mut self, season_number: u32, episode_number: u32) -> Self {
        self.season_number = Some(season_number);
        self.episode_number = Some(episode_number);
        self
    }

    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    pub fn with_season_poster(mut self, season_poster: impl Into<String>) -> Self {
        self.season_poster = Some(season_poster.into());
        self
    }

    pub fn with_still(mut self, still_path: impl Into<String>) -> Self {
        self.still_path = Some(still_path.into());
        self
    }

    /// Series this entry belongs to, falling back to the entry's own id
    pub fn series_key(&self) -> &CatalogId {
        match &self.series_id {
            Some(series_id) if !series_id.is_blank() => series_id,
            _ => &self.id,
        }
    }

    /// Season this entry names; 0 is how older adds wrote "no season"
    pub fn season(&self) -> Option<u32> {
        self.season_number.filter(|&season| season > 0)
    }

    /// Episode this entry names; 0 reads as absent
    pub fn episode(&self) -> Option<u32> {
        self.episode_number.filter(|&episode| episode > 0)
    }

    /// An episode number without a season number is treated as series-level
    pub fn scope(&self) -> EntryScope {
        match (self.season(), self.episode()) {
            (Some(_), Some(_)) => EntryScope::Episode,
            (Some(_), None) => EntryScope::Season,
            (None, _) => EntryScope::Series,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Interpret `added_at` as a point in time
    ///
    /// Accepts RFC 3339 strings, epoch milliseconds, and timestamp objects
    /// of the form `{"seconds": .., "nanoseconds": ..}` (with or without
    /// leading underscores).
    pub fn added_at_utc(&self) -> Option<DateTime<Utc>> {
        match self.added_at.as_ref()? {
            Value::String(raw) => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
            Value::Object(fields) => {
                let seconds = fields
                    .get("seconds")
                    .or_else(|| fields.get("_seconds"))
                    .and_then(Value::as_i64)?;
                let nanos = fields
                    .get("nanoseconds")
                    .or_else(|| fields.get("_nanoseconds"))
                    .and_then(Value::as_u64)
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or(0);
                DateTime::from_timestamp(seconds, nanos)
            }
            _ => None,
        }
    }
}

/// Season and episode numbers arrive as numbers, numeric strings or junk.
/// Anything that is not a non-negative integer reads as absent.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_series_key_falls_back_to_id() {
        let entry = WatchlistEntry::new(1, "Lone Show");
        assert_eq!(entry.series_key(), &CatalogId::Number(1));

        let entry = WatchlistEntry::new("ep-1", "Show - S1E1: Pilot").with_series(9);
        assert_eq!(entry.series_key(), &CatalogId::Number(9));

        let entry = WatchlistEntry::new(5, "Blank").with_series("");
        assert_eq!(entry.series_key(), &CatalogId::Number(5));
    }

    #[test]
    fn test_scope() {
        assert_eq!(WatchlistEntry::new(1, "a").scope(), EntryScope::Series);
        assert_eq!(WatchlistEntry::new(1, "a").with_season(2).scope(), EntryScope::Season);
        assert_eq!(WatchlistEntry::new(1, "a").with_episode(2, 3).scope(), EntryScope::Episode);

        let mut orphan = WatchlistEntry::new(1, "a");
        orphan.episode_number = Some(4);
        assert_eq!(orphan.scope(), EntryScope::Series);
    }

    #[test]
    fn test_zero_season_and_episode_read_as_absent() {
        let stored = json!({ "id": 1, "seriesId": 9, "seasonNumber": 0, "episodeNumber": 0 });
        let entry: WatchlistEntry = serde_json::from_value(stored.clone()).unwrap();

        assert_eq!(entry.season(), None);
        assert_eq!(entry.episode(), None);
        assert_eq!(entry.scope(), EntryScope::Series);
        // The stored zeros survive a write-back
        assert_eq!(serde_json::to_value(&entry).unwrap(), stored);

        let entry = WatchlistEntry::new(2, "a").with_episode(1, 0);
        assert_eq!(entry.scope(), EntryScope::Season);
    }

    #[test]
    fn test_deserialize_stored_document_entry() {
        let entry: WatchlistEntry = serde_json::from_value(json!({
            "id": 1001,
            "seriesId": 1399,
            "seasonNumber": "1",
            "episodeNumber": 3,
            "name": "Game of Thrones - S1E3: Lord Snow",
            "poster_path": "/series.jpg",
            "seasonPoster": "/season1.jpg",
            "still_path": "/still.jpg",
            "addedAt": "2024-03-01T12:00:00Z",
            "type": "tv",
            "vote_average": 8.4
        }))
        .unwrap();

        assert_eq!(entry.id, CatalogId::Number(1001));
        assert_eq!(entry.series_id, Some(CatalogId::Number(1399)));
        assert_eq!(entry.season_number, Some(1));
        assert_eq!(entry.episode_number, Some(3));
        assert_eq!(entry.season_poster.as_deref(), Some("/season1.jpg"));
        assert_eq!(entry.extra.get("type"), Some(&json!("tv")));
        assert_eq!(entry.extra.get("vote_average"), Some(&json!(8.4)));
    }

    #[test]
    fn test_missing_optional_fields() {
        let entry: WatchlistEntry = serde_json::from_value(json!({ "id": "abc" })).unwrap();
        assert_eq!(entry.name, None);
        assert_eq!(entry.display_name(), "");
        assert_eq!(entry.scope(), EntryScope::Series);
        assert!(entry.extra.is_empty());
    }

    #[test]
    fn test_junk_numbers_read_as_absent() {
        let entry: WatchlistEntry = serde_json::from_value(json!({
            "id": 1,
            "seasonNumber": true,
            "episodeNumber": "pilot"
        }))
        .unwrap();
        assert_eq!(entry.season_number, None);
        assert_eq!(entry.episode_number, None);
    }

    #[test]
    fn test_added_at_is_kept_verbatim() {
        let stored = json!({
            "id": 7,
            "name": "Show",
            "addedAt": { "seconds": 1709294400, "nanoseconds": 500 }
        });
        let entry: WatchlistEntry = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(serde_json::to_value(&entry).unwrap(), stored);
    }

    #[test]
    fn test_added_at_utc_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let mut entry = WatchlistEntry::new(1, "a");
        entry.added_at = Some(json!("2024-03-01T12:00:00.000Z"));
        assert_eq!(entry.added_at_utc(), Some(expected));

        entry.added_at = Some(json!(expected.timestamp_millis()));
        assert_eq!(entry.added_at_utc(), Some(expected));

        entry.added_at = Some(json!({ "_seconds": expected.timestamp(), "_nanoseconds": 0 }));
        assert_eq!(entry.added_at_utc(), Some(expected));

        entry.added_at = Some(json!(null));
        assert_eq!(entry.added_at_utc(), None);
    }
}
