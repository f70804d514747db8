//! Configuration loading for vault-gallery.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path};
pub use types::{ConfigFile, GalleryConfig, LoggingConfig, Profile, ResolvedConfig};
