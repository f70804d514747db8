//! In-memory resource and metadata caches.

use std::collections::HashMap;

use thiserror::Error;

use super::types::{IndexState, MediaResource, NoteMetadata};
use crate::media::{is_media_path, is_note_path};
use crate::rename::rewrite_media_references;
use crate::vault::{ExtractedNote, Vault, VaultError, extract_note};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("media index is not ready ({0}); rebuild the index to restart")]
    NotReady(String),

    #[error(transparent)]
    Vault(#[from] VaultError),
}

/// Media resources keyed by locator, plus the metadata notes linked to them.
#[derive(Debug, Default)]
pub struct ResourceIndex {
    state: IndexState,
    meta_folder: Option<String>,
    /// Locators in discovery order.
    order: Vec<String>,
    by_key: HashMap<String, MediaResource>,
    /// Vault path to locator.
    by_path: HashMap<String, String>,
    /// Media path to metadata note path.
    meta_links: HashMap<String, String>,
    /// Metadata note path to its parsed content.
    notes: HashMap<String, NoteMetadata>,
}

impl ResourceIndex {
    pub fn new(meta_folder: Option<String>) -> Self {
        let meta_folder = meta_folder
            .map(|f| f.trim_matches('/').to_string())
            .filter(|f| !f.is_empty());
        Self { meta_folder, ..Default::default() }
    }

    pub fn state(&self) -> IndexState {
        self.state
    }

    pub(super) fn set_state(&mut self, state: IndexState) {
        self.state = state;
    }

    /// Fail unless the media cache has been built at least once.
    pub fn ensure_ready(&self) -> Result<(), IndexError> {
        match self.state {
            IndexState::NotBuilt => {
                Err(IndexError::NotReady("media cache has not been built".to_string()))
            }
            IndexState::Ready | IndexState::Partial => Ok(()),
        }
    }

    pub fn meta_folder(&self) -> Option<&str> {
        self.meta_folder.as_deref()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All resources in discovery order.
    pub fn resources(&self) -> impl Iterator<Item = &MediaResource> {
        self.order.iter().filter_map(|key| self.by_key.get(key))
    }

    pub fn resource(&self, key: &str) -> Option<&MediaResource> {
        self.by_key.get(key)
    }

    pub fn resource_for_path(&self, path: &str) -> Option<&MediaResource> {
        self.by_path.get(path).and_then(|key| self.by_key.get(key))
    }

    pub fn path_for_key(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(|r| r.path.as_str())
    }

    pub fn key_for_path(&self, path: &str) -> Option<&str> {
        self.by_path.get(path).map(String::as_str)
    }

    pub fn meta_note_for(&self, path: &str) -> Option<&str> {
        self.meta_links.get(path).map(String::as_str)
    }

    pub fn metadata_for(&self, path: &str) -> Option<&NoteMetadata> {
        self.meta_links.get(path).and_then(|note| self.notes.get(note))
    }

    /// Number of media files with a metadata note.
    pub fn linked_count(&self) -> usize {
        self.meta_links.len()
    }

    /// Whether `path` is a markdown note inside the metadata folder.
    pub fn is_meta_note(&self, path: &str) -> bool {
        let Some(folder) = &self.meta_folder else {
            return false;
        };
        is_note_path(path)
            && path.strip_prefix(folder.as_str()).is_some_and(|rest| rest.starts_with('/'))
    }

    pub(super) fn clear_resources(&mut self) {
        self.order.clear();
        self.by_key.clear();
        self.by_path.clear();
    }

    pub(super) fn clear_meta(&mut self) {
        self.meta_links.clear();
        self.notes.clear();
    }

    pub(super) fn insert_resource(&mut self, resource: MediaResource) {
        if let Some(stale) = self.by_path.get(&resource.path).cloned() {
            self.by_key.remove(&stale);
            self.order.retain(|k| k != &stale);
        }
        self.by_path.insert(resource.path.clone(), resource.key.clone());
        self.order.push(resource.key.clone());
        self.by_key.insert(resource.key.clone(), resource);
    }

    fn remove_resource(&mut self, path: &str) -> Option<MediaResource> {
        let key = self.by_path.remove(path)?;
        self.order.retain(|k| k != &key);
        self.by_key.remove(&key)
    }

    /// Record `note_path` as the metadata note of `media_path`.
    pub fn link_meta(&mut self, media_path: &str, note_path: &str, metadata: NoteMetadata) {
        self.meta_links.insert(media_path.to_string(), note_path.to_string());
        self.notes.insert(note_path.to_string(), metadata);
    }

    /// Read one note's link and metadata from its content.
    ///
    /// The first embed resolving to an indexed media file becomes the link.
    /// Returns the linked media path, or `None` when no embed resolves.
    pub(super) fn apply_note(&mut self, note_path: &str, content: &str) -> Option<String> {
        let extracted = extract_note(content);
        let media_path = extracted
            .embeds
            .iter()
            .find_map(|embed| self.resolve_embed(&embed.target, note_path))?;

        self.meta_links.retain(|_, note| note != note_path);
        self.link_meta(&media_path, note_path, to_metadata(extracted));
        Some(media_path)
    }

    /// Resolve an embed target written in `note_path` to an indexed media path.
    ///
    /// Exact vault paths win; `./` and `../` targets are relative to the note;
    /// otherwise the first resource whose path ends with `/<target>` is used.
    pub fn resolve_embed(&self, target: &str, note_path: &str) -> Option<String> {
        let target = target.trim();
        let candidate = if target.starts_with("./") || target.starts_with("../") {
            join_relative(parent_folder(note_path), target)?
        } else {
            target.trim_start_matches('/').to_string()
        };
        if candidate.is_empty() || !is_media_path(&candidate) {
            return None;
        }
        if self.by_path.contains_key(&candidate) {
            return Some(candidate);
        }
        let suffix = format!("/{candidate}");
        self.resources().find(|r| r.path.ends_with(&suffix)).map(|r| r.path.clone())
    }

    /// Index a file that appeared in the vault.
    pub fn on_create(&mut self, vault: &Vault, path: &str) -> Result<(), IndexError> {
        if is_media_path(path) {
            let stat = vault.stat(path).ok_or_else(|| VaultError::NotFound(path.to_string()))?;
            tracing::debug!("indexing new media {path}");
            self.insert_resource(MediaResource::new(path, stat));
        } else if self.is_meta_note(path) {
            self.on_note_changed(vault, path)?;
        }
        Ok(())
    }

    /// Re-read one metadata note after its content changed.
    pub fn on_note_changed(&mut self, vault: &Vault, note_path: &str) -> Result<(), IndexError> {
        if !self.is_meta_note(note_path) {
            return Ok(());
        }
        let content = vault.read_text(note_path)?;
        if self.apply_note(note_path, &content).is_none() {
            tracing::debug!("metadata note {note_path} embeds no indexed media");
        }
        Ok(())
    }

    /// Follow a file moved from `old_path` to `new_path`.
    ///
    /// A moved media file is re-keyed in place and its metadata note is
    /// rewritten to reference the new path and locator.
    pub fn on_rename(
        &mut self,
        vault: &Vault,
        old_path: &str,
        new_path: &str,
    ) -> Result<(), IndexError> {
        if self.by_path.contains_key(old_path) {
            return self.rename_resource(vault, old_path, new_path);
        }
        if is_media_path(new_path) {
            return self.on_create(vault, new_path);
        }
        if is_note_path(old_path) || is_note_path(new_path) {
            self.rename_note(vault, old_path, new_path)?;
        }
        Ok(())
    }

    fn rename_resource(
        &mut self,
        vault: &Vault,
        old_path: &str,
        new_path: &str,
    ) -> Result<(), IndexError> {
        let Some(old) = self.by_path.remove(old_path).and_then(|k| self.by_key.remove(&k)) else {
            return Ok(());
        };
        if new_path != old_path && self.remove_resource(new_path).is_some() {
            tracing::debug!("rename over indexed media {new_path}");
        }
        let position = self.order.iter().position(|k| k == &old.key);

        if !is_media_path(new_path) {
            if let Some(pos) = position {
                self.order.remove(pos);
            }
            return Ok(());
        }

        let stat = vault.stat(new_path).unwrap_or(old.stat);
        let moved = MediaResource::new(new_path, stat);
        tracing::debug!("re-keying {} -> {}", old.key, moved.key);

        match position {
            Some(pos) => self.order[pos] = moved.key.clone(),
            None => self.order.push(moved.key.clone()),
        }
        self.by_path.insert(moved.path.clone(), moved.key.clone());
        self.by_key.insert(moved.key.clone(), moved.clone());

        let Some(note_path) = self.meta_links.remove(old_path) else {
            return Ok(());
        };
        self.meta_links.insert(new_path.to_string(), note_path.clone());

        let content = vault.read_text(&note_path)?;
        let rewritten = rewrite_media_references(
            &content,
            old_path,
            new_path,
            Some(&old.key),
            Some(&moved.key),
        );
        if rewritten != content {
            vault.write_text(&note_path, &rewritten)?;
            tracing::debug!("updated references in {note_path}");
        }
        self.notes.insert(note_path, to_metadata(extract_note(&rewritten)));
        Ok(())
    }

    fn rename_note(&mut self, vault: &Vault, old_path: &str, new_path: &str) -> Result<(), IndexError> {
        let metadata = self.notes.remove(old_path);
        self.meta_links.retain(|_, note| note != old_path);

        if !self.is_meta_note(new_path) {
            return Ok(());
        }
        if metadata.is_some() || vault.exists(new_path) {
            self.on_note_changed(vault, new_path)?;
        }
        Ok(())
    }

    /// Forget a file removed from the vault.
    ///
    /// A deleted media file keeps its metadata link; a deleted metadata note
    /// drops the links pointing at it.
    pub fn on_delete(&mut self, path: &str) {
        if self.remove_resource(path).is_some() {
            tracing::debug!("removed media {path}");
            return;
        }
        if self.notes.remove(path).is_some() {
            self.meta_links.retain(|_, note| note != path);
            tracing::debug!("removed metadata note {path}");
        }
    }
}

pub(super) fn to_metadata(extracted: ExtractedNote) -> NoteMetadata {
    NoteMetadata { tags: extracted.tags, fields: extracted.fields }
}

fn parent_folder(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

fn join_relative(base: &str, target: &str) -> Option<String> {
    let mut parts: Vec<&str> = base.split('/').filter(|p| !p.is_empty()).collect();
    for part in target.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::FileStat;
    use chrono::{TimeZone, Utc};

    fn stat(secs: i64) -> FileStat {
        let t = Utc.timestamp_opt(secs, 0).unwrap();
        FileStat { created: t, modified: t, size: 10 }
    }

    fn index_with(paths: &[&str]) -> ResourceIndex {
        let mut index = ResourceIndex::new(Some("meta".into()));
        for (i, path) in paths.iter().enumerate() {
            index.insert_resource(MediaResource::new(path, stat(i as i64 + 1)));
        }
        index.set_state(IndexState::Ready);
        index
    }

    #[test]
    fn not_ready_until_built() {
        let index = ResourceIndex::new(None);
        assert!(matches!(index.ensure_ready(), Err(IndexError::NotReady(_))));
        assert!(index_with(&[]).ensure_ready().is_ok());
    }

    #[test]
    fn key_is_locator_with_mtime() {
        let index = index_with(&["art/cat.png"]);
        let key = index.key_for_path("art/cat.png").unwrap();
        assert_eq!(key, "app://local/art/cat.png?1000");
        assert_eq!(index.path_for_key(key), Some("art/cat.png"));
    }

    #[test]
    fn resources_keep_discovery_order() {
        let index = index_with(&["b.png", "a.png", "c.mp4"]);
        let paths: Vec<_> = index.resources().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["b.png", "a.png", "c.mp4"]);
    }

    #[test]
    fn reinserting_a_path_replaces_stale_key() {
        let mut index = index_with(&["a.png"]);
        index.insert_resource(MediaResource::new("a.png", stat(99)));
        assert_eq!(index.len(), 1);
        assert_eq!(index.key_for_path("a.png"), Some("app://local/a.png?99000"));
    }

    #[test]
    fn rename_onto_indexed_path_leaves_one_entry() {
        let dir = tempfile::TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        vault.write_text("a.png", "new").unwrap();
        vault.write_text("b.png", "old").unwrap();
        let mut index = index_with(&["a.png", "b.png"]);

        // replaced outside the vault API, which refuses to overwrite
        std::fs::rename(dir.path().join("a.png"), dir.path().join("b.png")).unwrap();
        index.on_rename(&vault, "a.png", "b.png").unwrap();

        let paths: Vec<_> = index.resources().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["b.png"]);
        assert_eq!(index.len(), 1);
        assert!(index.key_for_path("a.png").is_none());
    }

    #[test]
    fn resolves_exact_suffix_and_relative_embeds() {
        let index = index_with(&["art/cat.png", "art/ink/dog.jpg"]);
        assert_eq!(index.resolve_embed("art/cat.png", "meta/x.md").as_deref(), Some("art/cat.png"));
        assert_eq!(index.resolve_embed("dog.jpg", "meta/x.md").as_deref(), Some("art/ink/dog.jpg"));
        assert_eq!(
            index.resolve_embed("../art/cat.png", "meta/x.md").as_deref(),
            Some("art/cat.png")
        );
        assert_eq!(index.resolve_embed("missing.png", "meta/x.md"), None);
        assert_eq!(index.resolve_embed("notes.md", "meta/x.md"), None);
    }

    #[test]
    fn apply_note_links_first_resolvable_embed() {
        let mut index = index_with(&["art/cat.png"]);
        let content = "---\ntags: [pet]\nartist: Ann\n---\n![[gone.png]]\n![[art/cat.png]]\n";
        assert_eq!(index.apply_note("meta/cat.md", content).as_deref(), Some("art/cat.png"));
        assert_eq!(index.meta_note_for("art/cat.png"), Some("meta/cat.md"));
        let meta = index.metadata_for("art/cat.png").unwrap();
        assert_eq!(meta.tags, vec!["pet"]);
        assert_eq!(meta.fields["artist"], vec!["Ann"]);
    }

    #[test]
    fn delete_keeps_meta_link() {
        let mut index = index_with(&["art/cat.png"]);
        index.apply_note("meta/cat.md", "![[art/cat.png]]");
        index.on_delete("art/cat.png");
        assert!(index.key_for_path("art/cat.png").is_none());
        assert!(index.resources().next().is_none());
        assert_eq!(index.meta_note_for("art/cat.png"), Some("meta/cat.md"));
    }

    #[test]
    fn deleting_the_note_drops_the_link() {
        let mut index = index_with(&["art/cat.png"]);
        index.apply_note("meta/cat.md", "![[art/cat.png]]");
        index.on_delete("meta/cat.md");
        assert_eq!(index.meta_note_for("art/cat.png"), None);
    }

    #[test]
    fn meta_note_detection() {
        let index = index_with(&[]);
        assert!(index.is_meta_note("meta/a.md"));
        assert!(index.is_meta_note("meta/sub/a.md"));
        assert!(!index.is_meta_note("metadata/a.md"));
        assert!(!index.is_meta_note("meta/a.png"));
        assert!(!ResourceIndex::new(None).is_meta_note("meta/a.md"));
    }
}
