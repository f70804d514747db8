//! Per-media information: file stats, metadata and backlinks.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::index::{IndexError, NoteMetadata, ResourceIndex};
use crate::media::{basename, is_video};
use crate::vault::{Vault, VaultError, extract_embeds};

/// Everything the info panel shows about one media file.
#[derive(Debug, Clone, Serialize)]
pub struct MediaInfo {
    pub path: String,
    pub locator: String,
    pub is_video: bool,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub meta_note: Option<String>,
    pub tags: Vec<String>,
    pub fields: BTreeMap<String, Vec<String>>,
    /// Notes (other than the metadata note) embedding the file.
    pub backlinks: Vec<String>,
}

/// Content of a freshly created metadata note.
pub fn meta_note_template(media_path: &str) -> String {
    format!("---\ntags: []\n---\n![[{media_path}]]\n")
}

/// Return the metadata note of `media_path`, creating it if needed.
///
/// Returns `None` when no metadata folder is configured.
pub fn ensure_meta_note(
    vault: &Vault,
    index: &mut ResourceIndex,
    media_path: &str,
) -> Result<Option<String>, IndexError> {
    if let Some(note) = index.meta_note_for(media_path)
        && vault.exists(note)
    {
        return Ok(Some(note.to_string()));
    }
    let Some(folder) = index.meta_folder().map(str::to_string) else {
        return Ok(None);
    };

    let name = basename(media_path);
    let stem = Path::new(name).file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    let note_path = vault.available_path(&folder, stem, "md");
    vault.create_text(&note_path, &meta_note_template(media_path))?;
    tracing::info!("created metadata note {note_path} for {media_path}");

    index.link_meta(media_path, &note_path, NoteMetadata::default());
    Ok(Some(note_path))
}

/// Notes embedding `media_path`, in vault order.
pub fn backlinks(
    vault: &Vault,
    index: &ResourceIndex,
    media_path: &str,
) -> Result<Vec<String>, IndexError> {
    let meta_note = index.meta_note_for(media_path);
    let notes = vault.walker()?.walk_notes(None).map_err(VaultError::from)?;

    let mut found = Vec::new();
    for note in notes {
        if Some(note.relative_path.as_str()) == meta_note {
            continue;
        }
        let content = match vault.read_text(&note.relative_path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!("skipping {}: {e}", note.relative_path);
                continue;
            }
        };
        let embeds_media = extract_embeds(&content).iter().any(|embed| {
            index.resolve_embed(&embed.target, &note.relative_path).as_deref() == Some(media_path)
        });
        if embeds_media {
            found.push(note.relative_path);
        }
    }
    Ok(found)
}

/// Collect info for an indexed media file.
///
/// With `create_note`, a missing metadata note is created first. Returns
/// `None` when the path is not in the index.
pub fn media_info(
    vault: &Vault,
    index: &mut ResourceIndex,
    media_path: &str,
    create_note: bool,
) -> Result<Option<MediaInfo>, IndexError> {
    index.ensure_ready()?;
    let Some(resource) = index.resource_for_path(media_path).cloned() else {
        return Ok(None);
    };

    let meta_note = if create_note {
        ensure_meta_note(vault, index, media_path)?
    } else {
        index.meta_note_for(media_path).map(str::to_string)
    };
    let metadata = index.metadata_for(media_path).cloned().unwrap_or_default();
    let backlinks = backlinks(vault, index, media_path)?;

    Ok(Some(MediaInfo {
        is_video: is_video(&resource.path),
        path: resource.path,
        locator: resource.key,
        size: resource.stat.size,
        created: resource.stat.created,
        modified: resource.stat.modified,
        meta_note,
        tags: metadata.tags,
        fields: metadata.fields,
        backlinks,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Vault, ResourceIndex) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("art")).unwrap();
        fs::create_dir_all(root.join("journal")).unwrap();
        fs::write(root.join("art/cat.png"), b"png").unwrap();
        fs::write(root.join("art/dog.png"), b"png").unwrap();
        fs::write(root.join("journal/day.md"), "Saw this: ![[cat.png]]\n").unwrap();
        fs::write(root.join("journal/other.md"), "![[art/dog.png]]\n").unwrap();

        let vault = Vault::new(root);
        let mut index = ResourceIndex::new(Some("meta".into()));
        index.rebuild(&vault, None).unwrap();
        (dir, vault, index)
    }

    #[test]
    fn creates_meta_note_lazily() {
        let (_dir, vault, mut index) = setup();
        assert!(index.meta_note_for("art/cat.png").is_none());

        let info = media_info(&vault, &mut index, "art/cat.png", true).unwrap().unwrap();

        assert_eq!(info.meta_note.as_deref(), Some("meta/cat.md"));
        assert_eq!(
            vault.read_text("meta/cat.md").unwrap(),
            "---\ntags: []\n---\n![[art/cat.png]]\n"
        );
        assert_eq!(index.meta_note_for("art/cat.png"), Some("meta/cat.md"));
        assert_eq!(info.backlinks, vec!["journal/day.md"]);
        assert!(!info.is_video);
    }

    #[test]
    fn existing_note_name_gets_a_suffix() {
        let (_dir, vault, mut index) = setup();
        vault.write_text("meta/cat.md", "unrelated").unwrap();

        let note = ensure_meta_note(&vault, &mut index, "art/cat.png").unwrap();
        assert_eq!(note.as_deref(), Some("meta/cat 1.md"));
    }

    #[test]
    fn without_meta_folder_nothing_is_created() {
        let (_dir, vault, _) = setup();
        let mut index = ResourceIndex::new(None);
        index.rebuild(&vault, None).unwrap();

        let info = media_info(&vault, &mut index, "art/cat.png", true).unwrap().unwrap();
        assert!(info.meta_note.is_none());
        assert!(info.tags.is_empty());
    }

    #[test]
    fn unknown_path_is_none() {
        let (_dir, vault, mut index) = setup();
        assert!(media_info(&vault, &mut index, "art/none.png", false).unwrap().is_none());
    }
}
