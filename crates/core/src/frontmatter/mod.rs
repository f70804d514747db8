//! Frontmatter parsing, modification, and serialization.
//!
//! This module provides functionality to:
//! - Parse YAML frontmatter from markdown documents
//! - Modify frontmatter fields (set, append, remove, delete)
//! - Serialize documents back to markdown with frontmatter
//! - Read-modify-write a vault note's header in one call

pub mod modifier;
pub mod parser;
pub mod serializer;
pub mod types;

pub use modifier::{FrontmatterModifyError, apply_ops, apply_to, process_frontmatter};
pub use parser::{FrontmatterParseError, parse};
pub use serializer::{serialize, serialize_with_order};
pub use types::{Frontmatter, FrontmatterOp, FrontmatterOpType, ParsedDocument};
