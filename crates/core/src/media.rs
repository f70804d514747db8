//! Media kinds and the extension allow-list used for discovery.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Image extensions the gallery displays.
pub const IMAGE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "gif", "bmp", "svg", "webp", "tif", "tiff", "avif"];

/// Video extensions the gallery displays.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mkv", "mov", "avi", "ogv", "m4v"];

// Locators carry a `?<mtime>` suffix, so the extension is matched before it.
static VIDEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(mp4|webm|mkv|mov|avi|ogv|m4v)(\?.*)?$").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a vault path by extension. Returns `None` for non-media files.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path).extension()?.to_str()?.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// Whether the path has an extension on the media allow-list.
pub fn is_media_path(path: &str) -> bool {
    MediaKind::from_path(path).is_some()
}

/// Whether a path or locator names a video.
pub fn is_video(path_or_locator: &str) -> bool {
    VIDEO_RE.is_match(path_or_locator)
}

/// Vault-relative path of a markdown note.
pub fn is_note_path(path: &str) -> bool {
    Path::new(path).extension().and_then(|e| e.to_str()).is_some_and(|e| e == "md")
}

/// Basename of a vault path (substring after the last `/`).
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
