//! Reference maintenance for moved media files.
//!
//! When a media file moves, its metadata note must follow: the embed, any
//! frontmatter value naming the file, and any stored locator are rewritten.

mod updater;

pub use updater::rewrite_media_references;
