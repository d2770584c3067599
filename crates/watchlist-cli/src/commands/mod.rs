pub mod basket;
pub mod config;
pub mod remove;
pub mod show;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::sync::Arc;
use tracing::debug;
use watchlist_config::{Config, PathManager};
use watchlist_core::{ImageResolver, JsonFileStore, WatchlistSession};

/// Effective configuration shared by every command
pub struct Context {
    pub config: Config,
    pub path_manager: PathManager,
}

impl Context {
    pub fn new(config: Config, path_manager: PathManager) -> Self {
        Self { config, path_manager }
    }

    pub fn store(&self) -> JsonFileStore {
        JsonFileStore::from_config(&self.config, &self.path_manager)
    }

    pub fn images(&self) -> ImageResolver {
        ImageResolver::from_config(&self.config.images)
    }

    pub async fn open_session(&self) -> Result<WatchlistSession> {
        let store = self.store();
        let path = store.path().to_path_buf();
        debug!("Reading watchlist for '{}' from {}", self.config.store.user, path.display());

        WatchlistSession::load(Arc::new(store))
            .await
            .wrap_err_with(|| format!("Failed to read watchlist from {}", path.display()))
    }
}
