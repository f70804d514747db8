//! Single-file actions.

use std::path::Path;

use super::ActionError;
use crate::frontmatter::{FrontmatterOp, apply_to, process_frontmatter};
use crate::index::ResourceIndex;
use crate::info::ensure_meta_note;
use crate::media::{basename, is_media_path};
use crate::vault::Vault;

fn require_indexed(index: &ResourceIndex, path: &str) -> Result<(), ActionError> {
    index.ensure_ready()?;
    if index.key_for_path(path).is_none() {
        return Err(ActionError::NotIndexed(path.to_string()));
    }
    Ok(())
}

fn normalize_tag(tag: &str) -> Option<&str> {
    let tag = tag.trim().trim_start_matches('#');
    (!tag.is_empty()).then_some(tag)
}

fn edit_tags(
    vault: &Vault,
    index: &mut ResourceIndex,
    path: &str,
    ops: Vec<FrontmatterOp>,
) -> Result<Vec<String>, ActionError> {
    require_indexed(index, path)?;
    let note = ensure_meta_note(vault, index, path)?.ok_or(ActionError::NoMetaFolder)?;

    process_frontmatter(vault, &note, |fm| apply_to(fm, &ops))?;
    index.on_note_changed(vault, &note)?;

    Ok(index.metadata_for(path).map(|m| m.tags.clone()).unwrap_or_default())
}

/// Add tags to the metadata note of `path`, creating the note if needed.
/// Returns the tags afterwards.
pub fn add_tags(
    vault: &Vault,
    index: &mut ResourceIndex,
    path: &str,
    tags: &[String],
) -> Result<Vec<String>, ActionError> {
    let ops = tags.iter().filter_map(|t| normalize_tag(t)).map(|t| FrontmatterOp::append("tags", t));
    edit_tags(vault, index, path, ops.collect())
}

/// Remove tags from the metadata note of `path`. Returns the tags afterwards.
pub fn remove_tags(
    vault: &Vault,
    index: &mut ResourceIndex,
    path: &str,
    tags: &[String],
) -> Result<Vec<String>, ActionError> {
    let ops = tags.iter().filter_map(|t| normalize_tag(t)).map(|t| FrontmatterOp::remove("tags", t));
    edit_tags(vault, index, path, ops.collect())
}

/// Move a media file. A target without an extension keeps the old one.
/// The metadata note follows the move. Returns the new vault path.
pub fn rename_media(
    vault: &Vault,
    index: &mut ResourceIndex,
    from: &str,
    to: &str,
) -> Result<String, ActionError> {
    require_indexed(index, from)?;

    let to = to.trim().trim_start_matches('/');
    let to = if Path::new(basename(to)).extension().is_none() {
        match Path::new(from).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{to}.{ext}"),
            None => to.to_string(),
        }
    } else {
        to.to_string()
    };
    if !is_media_path(&to) {
        return Err(ActionError::NotMedia(to));
    }

    vault.rename(from, &to)?;
    index.on_rename(vault, from, &to)?;
    tracing::info!("renamed {from} -> {to}");
    Ok(to)
}

/// Duplicate a media file. Without a target, a free ` 1`, ` 2`, ... name
/// next to the source is used. Returns the new vault path.
pub fn copy_media(
    vault: &Vault,
    index: &mut ResourceIndex,
    from: &str,
    to: Option<&str>,
) -> Result<String, ActionError> {
    require_indexed(index, from)?;

    let to = match to {
        Some(to) => to.trim().trim_start_matches('/').to_string(),
        None => {
            let source = Path::new(from);
            let folder = source.parent().and_then(|p| p.to_str()).unwrap_or("");
            let stem = source.file_stem().and_then(|s| s.to_str()).unwrap_or("copy");
            let ext = source.extension().and_then(|e| e.to_str()).unwrap_or("");
            vault.available_path(folder, stem, ext)
        }
    };
    if !is_media_path(&to) {
        return Err(ActionError::NotMedia(to));
    }

    vault.copy(from, &to)?;
    index.on_create(vault, &to)?;
    Ok(to)
}

/// Delete a media file. Its metadata note is left in place; use
/// [`batch_delete`](super::batch_delete) to remove both.
pub fn delete_media(
    vault: &Vault,
    index: &mut ResourceIndex,
    path: &str,
) -> Result<(), ActionError> {
    require_indexed(index, path)?;
    vault.delete(path)?;
    index.on_delete(path);
    tracing::info!("deleted {path}");
    Ok(())
}
