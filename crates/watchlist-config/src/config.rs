use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://via.placeholder.com/300x450/141414/FFFF00?text=No+Image";

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub images: ImageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the watch-list documents live
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoreConfig {
    /// Document id of the user whose watch list is shown
    #[serde(default = "default_user")]
    pub user: String,
    /// Directory holding `<user>.json` documents (defaults to `<data_dir>/users`)
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Catalog image CDN settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImageConfig {
    #[serde(default = "default_image_base_url")]
    pub base_url: String,
    /// Shown when an item has no poster at all
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    pub file: Option<PathBuf>,
}

fn default_user() -> String {
    "local".to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    use std::io::IsTerminal;
    !std::io::stdout().is_terminal()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            path: None,
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: default_image_base_url(),
            placeholder: default_placeholder(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json_logging(),
            file: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.store.user.trim().is_empty() {
            return Err(anyhow::anyhow!("store.user must not be empty"));
        }
        if self.store.user.contains(['/', '\\']) {
            return Err(anyhow::anyhow!(
                "store.user must be a plain document id, got '{}'",
                self.store.user
            ));
        }
        if self.images.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("images.base_url must not be empty"));
        }
        Ok(())
    }

    /// Directory of user documents, honoring `store.path`
    pub fn store_dir(&self, data_dir: &Path) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| data_dir.join("users"))
    }
}
