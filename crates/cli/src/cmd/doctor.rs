use gallery_core::config::{default_config_path, ConfigLoader};
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            println!("OK   gallery doctor");
            println!(
                "path: {}",
                config.map_or_else(
                    || default_config_path().display().to_string(),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("vault_root: {}", rc.vault_root.display());
            println!("meta_folder: {}", rc.meta_folder.as_deref().unwrap_or("(none)"));
            if !rc.vault_root.is_dir() {
                println!("warning: vault_root does not exist");
            }
            for folder in &rc.excluded_folders {
                println!("excluded: {}", folder.display());
            }
            println!("settings: {}", rc.settings_path().display());
            println!("gallery.item_width: {}", rc.gallery.item_width);
            if let Some(height) = rc.gallery.item_height {
                println!("gallery.item_height: {height}");
            }
            println!("gallery.confirm_threshold: {}", rc.gallery.confirm_threshold);
            println!("gallery.default_sort: {}", rc.gallery.default_sort);
        }
        Err(e) => {
            println!("FAIL gallery doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
