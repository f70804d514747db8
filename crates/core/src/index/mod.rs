//! Resource Index: every media file in the vault, keyed by locator, and the
//! metadata notes that describe them.
//!
//! The index holds:
//! - Media resources (locator, vault path, timestamps, size) in discovery order
//! - Metadata links from a media path to its companion note
//! - Tags and frontmatter fields parsed from each companion note
//!
//! Both caches are rebuilt by full scans and kept current by the `on_*`
//! maintenance hooks.
//!
//! # Example
//!
//! ```no_run
//! use gallery_core::index::ResourceIndex;
//! use gallery_core::vault::Vault;
//!
//! let vault = Vault::new("/path/to/vault");
//! let mut index = ResourceIndex::new(Some("Meta".into()));
//! index.rebuild(&vault, None).unwrap();
//!
//! for resource in index.resources() {
//!     println!("{} {}", resource.key, resource.path);
//! }
//! ```

pub mod builder;
pub mod cache;
pub mod types;

pub use builder::BuilderError;
pub use cache::{IndexError, ResourceIndex};
pub use types::{
    IndexState, IndexStats, MediaResource, NoteMetadata, Progress, ProgressCallback,
    resource_key,
};
