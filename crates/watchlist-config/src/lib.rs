pub mod config;
pub mod paths;

pub use config::{Config, ImageConfig, LoggingConfig, StoreConfig, DEFAULT_IMAGE_BASE_URL, DEFAULT_PLACEHOLDER_URL};
pub use paths::{PathManager, container_base_path};
