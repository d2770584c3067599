use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier as persisted in the entry store
///
/// Catalog items are written with numeric ids, while episode entries and
/// some older documents carry string ids. Both shapes round-trip unchanged.
///
/// Equality is strict: `Number(1)` and `Text("1")` are different ids. Code
/// that needs to group the two together (basket keys) goes through
/// [`CatalogId::group_key`] instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum CatalogId {
    Number(u64),
    Text(String),
}

impl CatalogId {
    /// Parse a user-supplied id, preferring the numeric form
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed
            .parse::<u64>()
            .map(CatalogId::Number)
            .unwrap_or_else(|_| CatalogId::Text(trimmed.to_string()))
    }

    /// True for ids that carry no value (`0` or an empty string)
    ///
    /// Stored documents sometimes hold these instead of omitting the field,
    /// and they must fall back the same way a missing field does.
    pub fn is_blank(&self) -> bool {
        match self {
            CatalogId::Number(n) => *n == 0,
            CatalogId::Text(s) => s.trim().is_empty(),
        }
    }

    /// Rendered form used for grouping, so `9` and `"9"` land together
    pub fn group_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogId::Number(n) => write!(f, "{}", n),
            CatalogId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for CatalogId {
    fn from(value: u64) -> Self {
        CatalogId::Number(value)
    }
}

impl From<&str> for CatalogId {
    fn from(value: &str) -> Self {
        CatalogId::Text(value.to_string())
    }
}

impl From<String> for CatalogId {
    fn from(value: String) -> Self {
        CatalogId::Text(value)
    }
}
