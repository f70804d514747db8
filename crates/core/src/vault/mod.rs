//! Vault file access, discovery and content extraction.
//!
//! This module provides utilities for reading and mutating vault files by
//! vault-relative path, walking vault directories for media and notes, and
//! extracting embeds, tags and frontmatter fields from notes.

pub mod extractor;
pub mod fs;
pub mod walker;

pub use extractor::{ExtractedEmbed, ExtractedNote, extract_embeds, extract_note};
pub use fs::{FileStat, Vault, VaultError};
pub use walker::{VaultWalker, VaultWalkerError, WalkedFile, to_vault_path};
