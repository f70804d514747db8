//! Index data types for media resources and their metadata notes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::vault::FileStat;

/// A discovered media file addressed by its resource locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaResource {
    /// Resource locator. Unique in the index; changes when the file moves
    /// or is modified.
    pub key: String,
    /// Vault-relative path.
    pub path: String,
    pub stat: FileStat,
}

impl MediaResource {
    pub fn new(path: &str, stat: FileStat) -> Self {
        Self { key: resource_key(path, &stat), path: path.to_string(), stat }
    }
}

/// Build the locator the gallery uses to address a media file.
pub fn resource_key(path: &str, stat: &FileStat) -> String {
    format!("app://local/{}?{}", path, stat.modified.timestamp_millis())
}

/// Tags and frontmatter fields of one metadata note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteMetadata {
    /// Tags without the leading `#`.
    pub tags: Vec<String>,
    /// Every frontmatter field as a list of strings.
    pub fields: BTreeMap<String, Vec<String>>,
}

/// Lifecycle of the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexState {
    /// No media scan has completed yet.
    #[default]
    NotBuilt,
    /// Full scans completed.
    Ready,
    /// A metadata scan was cancelled; entries applied so far are kept.
    Partial,
}

/// Statistics from a cache rebuild.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Number of files discovered.
    pub files_found: usize,
    /// Number of media resources indexed.
    pub media_indexed: usize,
    /// Number of metadata notes linked to a media file.
    pub notes_linked: usize,
    /// Number of notes skipped (unreadable or without a resolvable embed).
    pub notes_skipped: usize,
    /// Whether the scan was cancelled through the progress callback.
    pub cancelled: bool,
    /// Rebuild duration in milliseconds.
    pub duration_ms: u64,
}

/// Answer of a progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Cancel,
}

/// Progress callback for long scans.
/// Parameters: (current, total, current_path)
pub type ProgressCallback<'a> = Box<dyn FnMut(usize, usize, &str) -> Progress + 'a>;
