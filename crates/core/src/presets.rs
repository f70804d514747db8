//! Named filter presets stored in the gallery settings file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A saved filter: a name and a serialized filter block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub filter: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Settings {
    #[serde(default)]
    filters: Vec<Preset>,
    /// Settings written by other tools, kept as-is.
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

/// Presets loaded from one settings file.
#[derive(Debug)]
pub struct PresetStore {
    path: PathBuf,
    settings: Settings,
}

impl PresetStore {
    /// Load presets; a missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, PresetError> {
        let settings = if path.exists() {
            let content = fs::read_to_string(path).map_err(|source| PresetError::Read {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| PresetError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            Settings::default()
        };
        Ok(Self { path: path.to_path_buf(), settings })
    }

    pub fn save(&self) -> Result<(), PresetError> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        let write_err = |source| PresetError::Write { path: self.path.display().to_string(), source };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, json + "\n").map_err(write_err)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn presets(&self) -> &[Preset] {
        &self.settings.filters
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.settings.filters.iter().find(|p| p.name == name)
    }

    /// Add or replace a preset. Returns true if one was replaced.
    pub fn upsert(&mut self, name: &str, filter: String) -> bool {
        if let Some(existing) = self.settings.filters.iter_mut().find(|p| p.name == name) {
            existing.filter = filter;
            return true;
        }
        self.settings.filters.push(Preset { name: name.to_string(), filter });
        false
    }

    /// Remove a preset. Returns true if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.settings.filters.len();
        self.settings.filters.retain(|p| p.name != name);
        self.settings.filters.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = PresetStore::load(&dir.path().join(".gallery/settings.json")).unwrap();
        assert!(store.presets().is_empty());
    }

    #[test]
    fn save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".gallery/settings.json");

        let mut store = PresetStore::load(&path).unwrap();
        assert!(!store.upsert("cats", "```gallery-search\ntags:cat\n```".into()));
        assert!(store.upsert("cats", "```gallery-search\ntags:cat -dog\n```".into()));
        store.upsert("ink", "```gallery-search\npath:ink\n```".into());
        store.save().unwrap();

        let mut store = PresetStore::load(&path).unwrap();
        assert_eq!(store.presets().len(), 2);
        assert!(store.get("cats").unwrap().filter.contains("-dog"));
        assert!(store.remove("ink"));
        assert!(!store.remove("ink"));
    }

    #[test]
    fn unknown_settings_are_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"galleryLoadPath":"art","filters":[]}"#).unwrap();

        let mut store = PresetStore::load(&path).unwrap();
        store.upsert("a", "x".into());
        store.save().unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        assert!(saved.contains("\"galleryLoadPath\": \"art\""));
        assert!(saved.contains("\"name\": \"a\""));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(PresetStore::load(&path), Err(PresetError::Parse { .. })));
    }
}
