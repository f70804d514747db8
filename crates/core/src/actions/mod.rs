//! Context actions on media files: tag edits, rename, copy, delete, and their
//! batch versions.
//!
//! Every action writes through the [`Vault`](crate::vault::Vault) and then
//! updates the [`ResourceIndex`](crate::index::ResourceIndex) itself, so the
//! index is current as soon as the action returns.

pub mod batch;
pub mod media;

use thiserror::Error;

use crate::frontmatter::FrontmatterModifyError;
use crate::index::IndexError;
use crate::vault::VaultError;

pub use batch::{BatchReport, TagChanges, batch_delete, batch_tag};
pub use media::{add_tags, copy_media, delete_media, remove_tags, rename_media};

#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("not an indexed media file: {0}")]
    NotIndexed(String),

    #[error("no metadata folder configured; tags cannot be stored")]
    NoMetaFolder,

    #[error("not a media file name: {0}")]
    NotMedia(String),

    #[error("{0} items need confirmation and it was declined")]
    Declined(usize),

    #[error(transparent)]
    Frontmatter(#[from] FrontmatterModifyError),

    #[error(transparent)]
    Vault(#[from] VaultError),
}
