//! Frontmatter types and data structures.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;

/// Represents parsed YAML frontmatter from a markdown document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Fields as key-value pairs.
    #[serde(flatten)]
    pub fields: HashMap<String, Value>,
}

/// Result of splitting frontmatter from markdown.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Parsed frontmatter (if present).
    pub frontmatter: Option<Frontmatter>,
    /// The markdown body (everything after frontmatter).
    pub body: String,
}

/// A single frontmatter modification operation.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontmatterOp {
    /// Field name to modify.
    pub field: String,
    /// Operation type.
    pub op: FrontmatterOpType,
    /// Value for set/append/remove operations.
    pub value: Option<Value>,
}

impl FrontmatterOp {
    pub fn append(field: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            op: FrontmatterOpType::Append,
            value: Some(Value::String(value.to_string())),
        }
    }

    pub fn remove(field: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            op: FrontmatterOpType::Remove,
            value: Some(Value::String(value.to_string())),
        }
    }

    pub fn set(field: &str, value: Value) -> Self {
        Self { field: field.to_string(), op: FrontmatterOpType::Set, value: Some(value) }
    }
}

/// Type of frontmatter operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterOpType {
    /// Set field to value (creates if missing).
    Set,
    /// Append to list field unless already present.
    Append,
    /// Remove matching entries from a list field.
    Remove,
    /// Delete the field.
    Delete,
}
