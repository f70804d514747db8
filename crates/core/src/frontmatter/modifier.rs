//! Frontmatter modification operations.

use super::parser::{FrontmatterParseError, parse};
use super::serializer::serialize_with_order;
use super::types::{Frontmatter, FrontmatterOp, FrontmatterOpType, ParsedDocument};
use crate::vault::{Vault, VaultError};
use serde_yaml::Value;
use thiserror::Error;

/// Errors that can occur during frontmatter modification.
#[derive(Debug, Error)]
pub enum FrontmatterModifyError {
    #[error("field '{0}' is not a list, cannot append or remove")]
    NotList(String),

    #[error(transparent)]
    Parse(#[from] FrontmatterParseError),

    #[error(transparent)]
    Vault(#[from] VaultError),
}

/// Apply frontmatter operations to a document.
pub fn apply_ops(
    mut doc: ParsedDocument,
    ops: &[FrontmatterOp],
) -> Result<ParsedDocument, FrontmatterModifyError> {
    apply_to(doc.frontmatter.get_or_insert_with(Frontmatter::default), ops)?;
    Ok(doc)
}

/// Apply frontmatter operations in place, in order.
pub fn apply_to(fm: &mut Frontmatter, ops: &[FrontmatterOp]) -> Result<(), FrontmatterModifyError> {
    for op in ops {
        apply_single_op(fm, op)?;
    }
    Ok(())
}

fn apply_single_op(
    fm: &mut Frontmatter,
    op: &FrontmatterOp,
) -> Result<(), FrontmatterModifyError> {
    match op.op {
        FrontmatterOpType::Set => {
            if let Some(value) = &op.value {
                fm.fields.insert(op.field.clone(), value.clone());
            }
        }
        FrontmatterOpType::Delete => {
            fm.fields.remove(&op.field);
        }
        FrontmatterOpType::Append => {
            let Some(value) = &op.value else { return Ok(()) };
            let mut seq = take_list(fm, &op.field)?;
            if !seq.contains(value) {
                seq.push(value.clone());
            }
            fm.fields.insert(op.field.clone(), Value::Sequence(seq));
        }
        FrontmatterOpType::Remove => {
            let Some(value) = &op.value else { return Ok(()) };
            if !fm.fields.contains_key(&op.field) {
                return Ok(());
            }
            let mut seq = take_list(fm, &op.field)?;
            seq.retain(|v| v != value);
            fm.fields.insert(op.field.clone(), Value::Sequence(seq));
        }
    }
    Ok(())
}

/// Current list value of a field. A scalar string is split on commas and
/// whitespace, the way tag fields are often written by hand.
fn take_list(fm: &Frontmatter, field: &str) -> Result<Vec<Value>, FrontmatterModifyError> {
    match fm.fields.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Sequence(seq)) => Ok(seq.clone()),
        Some(Value::String(s)) => Ok(s
            .split([',', ' '])
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| Value::String(t.to_string()))
            .collect()),
        Some(_) => Err(FrontmatterModifyError::NotList(field.to_string())),
    }
}

/// Read-modify-write the frontmatter of a vault note.
///
/// The note is re-read right before the edit, so concurrent edits made by
/// other tools between index time and now are kept. `tags` is written first.
pub fn process_frontmatter<F>(
    vault: &Vault,
    path: &str,
    edit: F,
) -> Result<Frontmatter, FrontmatterModifyError>
where
    F: FnOnce(&mut Frontmatter) -> Result<(), FrontmatterModifyError>,
{
    let content = vault.read_text(path)?;
    let mut doc = parse(&content)?;
    let fm = doc.frontmatter.get_or_insert_with(Frontmatter::default);
    edit(fm)?;
    let updated = fm.clone();

    let out = serialize_with_order(&doc, Some(&["tags".to_string()]));
    if out != content {
        vault.write_text(path, &out)?;
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tags(fm: &Frontmatter) -> Vec<String> {
        fm.fields
            .get("tags")
            .and_then(Value::as_sequence)
            .map(|s| s.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn append_is_unique_and_creates_list() {
        let doc = ParsedDocument { frontmatter: None, body: String::new() };
        let ops = vec![
            FrontmatterOp::append("tags", "cat"),
            FrontmatterOp::append("tags", "cat"),
            FrontmatterOp::append("tags", "dog"),
        ];
        let doc = apply_ops(doc, &ops).unwrap();
        assert_eq!(tags(doc.frontmatter.as_ref().unwrap()), vec!["cat", "dog"]);
    }

    #[test]
    fn remove_from_string_field() {
        let doc = parse("---\ntags: cat, dog\n---\n").unwrap();
        let doc = apply_ops(doc, &[FrontmatterOp::remove("tags", "cat")]).unwrap();
        assert_eq!(tags(doc.frontmatter.as_ref().unwrap()), vec!["dog"]);
    }

    #[test]
    fn append_to_mapping_fails() {
        let doc = parse("---\ntags:\n  a: 1\n---\n").unwrap();
        let err = apply_ops(doc, &[FrontmatterOp::append("tags", "x")]).unwrap_err();
        assert!(matches!(err, FrontmatterModifyError::NotList(_)));
    }

    #[test]
    fn process_frontmatter_writes_back() {
        let dir = TempDir::new().unwrap();
        let vault = Vault::new(dir.path());
        vault.write_text("meta/cat.md", "---\nartist: Ann\n---\n![[cat.png]]\n").unwrap();

        let fm = process_frontmatter(&vault, "meta/cat.md", |fm| {
            apply_single_op(fm, &FrontmatterOp::append("tags", "pet"))
        })
        .unwrap();

        assert_eq!(tags(&fm), vec!["pet"]);
        assert_eq!(
            vault.read_text("meta/cat.md").unwrap(),
            "---\ntags:\n- pet\nartist: Ann\n---\n![[cat.png]]\n"
        );
    }
}
