use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::filter::SortKey;

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub gallery: GalleryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct Profile {
    pub vault_root: String,
    /// Folder holding one metadata note per media file. Metadata features
    /// (tags, frontmatter filters, info notes) are disabled when unset.
    pub meta_folder: Option<String>,
    /// Folders to exclude from media discovery (relative to vault_root).
    #[serde(default)]
    pub excluded_folders: Vec<String>,
}

/// Grid and action defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct GalleryConfig {
    /// Maximum width of one grid item in pixels.
    #[serde(default = "default_item_width")]
    pub item_width: u32,
    /// Optional maximum item height in pixels.
    #[serde(default)]
    pub item_height: Option<u32>,
    /// Batch operations over more items than this ask for confirmation.
    #[serde(default = "default_confirm_threshold")]
    pub confirm_threshold: usize,
    #[serde(default)]
    pub default_sort: SortKey,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            item_width: default_item_width(),
            item_height: None,
            confirm_threshold: default_confirm_threshold(),
            default_sort: SortKey::default(),
        }
    }
}

fn default_item_width() -> u32 {
    200
}

fn default_confirm_threshold() -> usize {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    pub vault_root: PathBuf,
    /// Metadata folder relative to the vault root, if configured.
    pub meta_folder: Option<String>,
    /// Folders to exclude from media discovery, relative to the vault root.
    pub excluded_folders: Vec<PathBuf>,
    pub gallery: GalleryConfig,
    pub logging: LoggingConfig,
}

impl ResolvedConfig {
    /// Path of the JSON settings file holding named filter presets.
    pub fn settings_path(&self) -> PathBuf {
        self.vault_root.join(".gallery").join("settings.json")
    }
}
