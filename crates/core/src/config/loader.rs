use crate::config::types::{ConfigFile, GalleryConfig, LoggingConfig, Profile, ResolvedConfig};
use shellexpand::full;
use std::path::{Path, PathBuf};
use std::{env, fs};

use dirs::home_dir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}")]
    NotFound(String),

    #[error("failed to read config file {0}: {1}")]
    ReadError(String, #[source] std::io::Error),

    #[error("failed to parse TOML in {0}: {1}")]
    ParseError(String, #[source] toml::de::Error),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("no profiles defined in config")]
    NoProfiles,

    #[error("version {0} is unsupported (expected 1)")]
    BadVersion(u32),

    #[error("home directory not available to expand '~'")]
    NoHome,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(
        config_path: Option<&Path>,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let s = fs::read_to_string(&path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e))?;

        Self::from_toml(&s, profile_override)
            .map_err(|e| match e {
                ConfigError::ParseError(_, err) => {
                    ConfigError::ParseError(path.display().to_string(), err)
                }
                other => other,
            })
    }

    /// Resolve a configuration from TOML text.
    pub fn from_toml(
        s: &str,
        profile_override: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let cf: ConfigFile = toml::from_str(s)
            .map_err(|e| ConfigError::ParseError("<inline>".to_string(), e))?;

        if cf.version != 1 {
            return Err(ConfigError::BadVersion(cf.version));
        }
        if cf.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }

        let active = profile_override
            .map(ToOwned::to_owned)
            .or(cf.profile.clone())
            .unwrap_or_else(|| "default".to_string());

        let prof = cf
            .profiles
            .get(&active)
            .ok_or_else(|| ConfigError::ProfileNotFound(active.clone()))?;

        Self::resolve_profile(&active, prof, &cf.gallery, &cf.logging)
    }

    fn resolve_profile(
        active: &str,
        prof: &Profile,
        gallery: &GalleryConfig,
        log_cfg: &LoggingConfig,
    ) -> Result<ResolvedConfig, ConfigError> {
        let vault_root = expand_path(&prof.vault_root)?;
        let sub = |s: &str| s.replace("{{vault_root}}", &vault_root.to_string_lossy());

        let meta_folder = match &prof.meta_folder {
            Some(folder) => {
                let expanded = expand_path(&sub(folder))?;
                let relative = expanded.strip_prefix(&vault_root).unwrap_or(&expanded);
                let relative = relative.to_string_lossy().trim_matches('/').to_string();
                // An empty folder would claim every note in the vault.
                (!relative.is_empty()).then_some(relative)
            }
            None => None,
        };

        let excluded_folders = prof
            .excluded_folders
            .iter()
            .map(|f| PathBuf::from(f.trim_matches('/')))
            .collect();

        // Resolve log file path if present
        let logging = if let Some(ref file) = log_cfg.file {
            let expanded_file = expand_path(&sub(&file.to_string_lossy()))?;
            LoggingConfig {
                level: log_cfg.level.clone(),
                file_level: log_cfg.file_level.clone(),
                file: Some(expanded_file),
            }
        } else {
            log_cfg.clone()
        };

        Ok(ResolvedConfig {
            active_profile: active.to_string(),
            vault_root,
            meta_folder,
            excluded_folders,
            gallery: gallery.clone(),
            logging,
        })
    }
}

pub fn default_config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("vault-gallery").join("config.toml");
    }
    let home = home_dir().unwrap_or_else(|| PathBuf::from("~"));
    home.join(".config").join("vault-gallery").join("config.toml")
}

fn expand_path(input: &str) -> Result<PathBuf, ConfigError> {
    let expanded = full(input).map_err(|_| ConfigError::NoHome)?;
    Ok(PathBuf::from(expanded.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SortKey;

    #[test]
    fn meta_folder_relative_to_vault_root() {
        let toml = r#"
version = 1
[profiles.default]
vault_root = "/tmp/vault"
meta_folder = "{{vault_root}}/gallery/meta/"
"#;
        let rc = ConfigLoader::from_toml(toml, None).unwrap();
        assert_eq!(rc.meta_folder.as_deref(), Some("gallery/meta"));
        assert_eq!(rc.gallery.item_width, 200);
        assert_eq!(rc.gallery.default_sort, SortKey::Unsorted);
    }

    #[test]
    fn gallery_table_overrides_defaults() {
        let toml = r#"
version = 1
profile = "work"
[profiles.work]
vault_root = "/tmp/vault"

[gallery]
item_width = 320
item_height = 400
confirm_threshold = 3
default_sort = "MDATE"
"#;
        let rc = ConfigLoader::from_toml(toml, None).unwrap();
        assert_eq!(rc.active_profile, "work");
        assert!(rc.meta_folder.is_none());
        assert_eq!(rc.gallery.item_width, 320);
        assert_eq!(rc.gallery.item_height, Some(400));
        assert_eq!(rc.gallery.confirm_threshold, 3);
        assert_eq!(rc.gallery.default_sort, SortKey::MDate);
    }
}
