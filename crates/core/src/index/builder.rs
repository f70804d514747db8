//! Full cache rebuilds.

use std::time::Instant;

use thiserror::Error;

use super::cache::ResourceIndex;
use super::types::{IndexState, IndexStats, MediaResource, Progress, ProgressCallback};
use crate::vault::{FileStat, Vault, VaultError};

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),
}

impl ResourceIndex {
    /// Rescan the vault for media files, replacing the resource cache.
    pub fn build_image_cache(&mut self, vault: &Vault) -> Result<IndexStats, BuilderError> {
        let start = Instant::now();
        let mut stats = IndexStats::default();

        let files = vault.walker()?.walk_media().map_err(VaultError::from)?;
        stats.files_found = files.len();

        self.clear_resources();
        for file in &files {
            self.insert_resource(MediaResource::new(&file.relative_path, FileStat::from(file)));
        }
        stats.media_indexed = self.len();

        if self.state() == IndexState::NotBuilt {
            self.set_state(IndexState::Ready);
        }
        stats.duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!("indexed {} media files in {}ms", stats.media_indexed, stats.duration_ms);
        Ok(stats)
    }

    /// Rescan the metadata folder, replacing every metadata link.
    ///
    /// The callback is consulted once per note. Cancelling keeps the links
    /// applied so far and leaves the index [`IndexState::Partial`].
    pub fn build_meta_cache(
        &mut self,
        vault: &Vault,
        mut progress: Option<ProgressCallback>,
    ) -> Result<IndexStats, BuilderError> {
        let start = Instant::now();
        let mut stats = IndexStats::default();

        let Some(folder) = self.meta_folder().map(str::to_string) else {
            tracing::warn!("no metadata folder configured; tag and field filters are disabled");
            return Ok(stats);
        };

        let notes = vault.walker()?.walk_notes(Some(&folder)).map_err(VaultError::from)?;
        stats.files_found = notes.len();
        self.clear_meta();

        for (i, note) in notes.iter().enumerate() {
            if let Some(cb) = progress.as_mut()
                && cb(i + 1, notes.len(), &note.relative_path) == Progress::Cancel
            {
                tracing::info!("metadata scan cancelled after {i} of {} notes", notes.len());
                stats.cancelled = true;
                break;
            }

            let content = match vault.read_text(&note.relative_path) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", note.relative_path, e);
                    stats.notes_skipped += 1;
                    continue;
                }
            };

            match self.apply_note(&note.relative_path, &content) {
                Some(_) => stats.notes_linked += 1,
                None => {
                    tracing::debug!("{} embeds no indexed media", note.relative_path);
                    stats.notes_skipped += 1;
                }
            }
        }

        if self.state() != IndexState::NotBuilt {
            self.set_state(if stats.cancelled { IndexState::Partial } else { IndexState::Ready });
        }
        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok(stats)
    }

    /// Build both caches, media first so metadata embeds can resolve.
    pub fn rebuild(
        &mut self,
        vault: &Vault,
        progress: Option<ProgressCallback>,
    ) -> Result<IndexStats, BuilderError> {
        let media = self.build_image_cache(vault)?;
        let meta = self.build_meta_cache(vault, progress)?;
        Ok(IndexStats {
            files_found: media.files_found + meta.files_found,
            media_indexed: media.media_indexed,
            notes_linked: meta.notes_linked,
            notes_skipped: meta.notes_skipped,
            cancelled: meta.cancelled,
            duration_ms: media.duration_ms + meta.duration_ms,
        })
    }
}
