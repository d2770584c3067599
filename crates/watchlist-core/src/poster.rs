use std::fmt;
use watchlist_config::ImageConfig;
use watchlist_models::{DisplayItem, WatchlistEntry};

/// Image widths offered by the catalog CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    W200,
    W300,
    W500,
    H632,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W200 => "w200",
            ImageSize::W300 => "w300",
            ImageSize::W500 => "w500",
            ImageSize::H632 => "h632",
            ImageSize::Original => "original",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds image URLs from the stored poster and still paths
///
/// Presentation helper only; aggregation decides which path to show and
/// never builds URLs itself.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base_url: String,
    placeholder: String,
}

impl ImageResolver {
    pub fn new(base_url: impl Into<String>, placeholder: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            placeholder: placeholder.into(),
        }
    }

    pub fn from_config(images: &ImageConfig) -> Self {
        Self::new(images.base_url.clone(), images.placeholder.clone())
    }

    /// Paths are stored with their leading slash, e.g. `/abc.jpg`
    pub fn image_url(&self, path: &str, size: ImageSize) -> String {
        format!("{}/{}{}", self.base_url, size, path)
    }

    pub fn poster_url(&self, path: Option<&str>, size: ImageSize) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => self.image_url(path, size),
            None => self.placeholder.clone(),
        }
    }

    /// Grid poster for an aggregated item
    pub fn display_poster(&self, item: &DisplayItem) -> String {
        self.poster_url(item.poster_path(), ImageSize::W500)
    }

    /// Episode card image: the still if there is one, else the series poster
    pub fn episode_thumbnail(&self, episode: &WatchlistEntry) -> String {
        let path = episode
            .still_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(episode.poster_path.as_deref());
        self.poster_url(path, ImageSize::W300)
    }
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::from_config(&ImageConfig::default())
    }
}
