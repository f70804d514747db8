//! Frontmatter serialization back to markdown.

use super::types::ParsedDocument;
use serde_yaml::Value;
use std::collections::HashMap;

/// Serialize a parsed document back to markdown string.
pub fn serialize(doc: &ParsedDocument) -> String {
    serialize_with_order(doc, None)
}

/// Serialize a parsed document with optional field ordering.
pub fn serialize_with_order(doc: &ParsedDocument, order: Option<&[String]>) -> String {
    if let Some(fm) = &doc.frontmatter
        && !fm.fields.is_empty()
    {
        let yaml = serialize_frontmatter(&fm.fields, order);
        return format!("---\n{}---\n{}", yaml, doc.body);
    }
    doc.body.clone()
}

/// Serialize frontmatter fields to YAML string.
fn serialize_frontmatter(
    fields: &HashMap<String, Value>,
    order: Option<&[String]>,
) -> String {
    let mut mapping = serde_yaml::Mapping::new();

    let mut added_keys = Vec::new();

    if let Some(order_list) = order {
        for key in order_list {
            if let Some(value) = fields.get(key) {
                mapping.insert(Value::String(key.clone()), value.clone());
                added_keys.push(key.clone());
            }
        }
    }

    // Remaining fields sorted so rewrites are stable
    let mut remaining: Vec<_> =
        fields.keys().filter(|k| !added_keys.contains(k)).collect();
    remaining.sort();

    for key in remaining {
        if let Some(value) = fields.get(key) {
            mapping.insert(Value::String(key.clone()), value.clone());
        }
    }

    serde_yaml::to_string(&mapping).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::Frontmatter;
    use crate::frontmatter::parser::parse;

    #[test]
    fn serialize_document_without_frontmatter() {
        let doc = ParsedDocument { frontmatter: None, body: "![[a.png]]".to_string() };
        assert_eq!(serialize(&doc), "![[a.png]]");
    }

    #[test]
    fn serialize_document_with_frontmatter() {
        let mut fields = HashMap::new();
        fields.insert("artist".to_string(), Value::String("Ann".to_string()));

        let doc = ParsedDocument {
            frontmatter: Some(Frontmatter { fields }),
            body: "![[a.png]]\n".to_string(),
        };

        assert_eq!(serialize(&doc), "---\nartist: Ann\n---\n![[a.png]]\n");
    }

    #[test]
    fn tags_first_when_ordered() {
        let original = "---\nzeta: 1\ntags:\n- a\n---\nbody";
        let parsed = parse(original).unwrap();
        let out = serialize_with_order(&parsed, Some(&["tags".to_string()]));
        assert_eq!(out, "---\ntags:\n- a\nzeta: 1\n---\nbody");
    }

    #[test]
    fn rewrite_is_stable() {
        let original = "---\ntags:\n- a\n---\n![[a.png]]\n";
        let once = serialize(&parse(original).unwrap());
        let twice = serialize(&parse(&once).unwrap());
        assert_eq!(once, original);
        assert_eq!(twice, once);
    }
}
