//! Frontmatter parsing from markdown documents.

use super::types::{Frontmatter, ParsedDocument};
use thiserror::Error;

/// Errors that can occur during frontmatter parsing.
#[derive(Debug, Error)]
pub enum FrontmatterParseError {
    #[error("invalid YAML frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),
}

/// Parse frontmatter from markdown content.
///
/// Frontmatter is delimited by `---` at the start of the document:
/// ```markdown
/// ---
/// tags: [cat]
/// ---
/// ![[cat.png]]
/// ```
pub fn parse(content: &str) -> Result<ParsedDocument, FrontmatterParseError> {
    let Some((yaml, body)) = split_frontmatter(content) else {
        return Ok(ParsedDocument { frontmatter: None, body: content.to_string() });
    };

    let frontmatter = if yaml.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml.trim())?
    };
    Ok(ParsedDocument { frontmatter: Some(frontmatter), body: body.to_string() })
}

/// Split a document into its YAML block and body.
///
/// Returns `None` unless the document opens with `---` and a later line is
/// exactly `---`.
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = skip_newline(content.trim_start().strip_prefix("---")?);

    let mut pos = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim() == "---" {
            return Some((&rest[..pos], &rest[pos + line.len()..]));
        }
        pos += line.len();
    }
    None
}

fn skip_newline(s: &str) -> &str {
    s.strip_prefix('\n').or_else(|| s.strip_prefix("\r\n")).unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_frontmatter() {
        let content = "![[cat.png]]\n\nSome content";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.is_none());
        assert_eq!(result.body, content);
    }

    #[test]
    fn parse_simple_frontmatter() {
        let content = "---\ntitle: Hello\n---\n![[cat.png]]";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert_eq!(fm.fields.get("title").and_then(|v| v.as_str()), Some("Hello"));
        assert_eq!(result.body, "![[cat.png]]");
    }

    #[test]
    fn parse_frontmatter_with_list() {
        let content = "---\ntags:\n  - rust\n  - cli\n---\n\nBody";
        let result = parse(content).unwrap();
        let fm = result.frontmatter.unwrap();
        assert_eq!(fm.fields.get("tags").and_then(|v| v.as_sequence()).map(Vec::len), Some(2));
        assert_eq!(result.body, "\nBody");
    }

    #[test]
    fn parse_empty_frontmatter() {
        let content = "---\n---\n# Content";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.unwrap().fields.is_empty());
        assert_eq!(result.body, "# Content");
    }

    #[test]
    fn parse_crlf_frontmatter() {
        let content = "---\r\ntags: [a]\r\n---\r\nbody";
        let result = parse(content).unwrap();
        assert!(result.frontmatter.unwrap().fields.contains_key("tags"));
        assert_eq!(result.body, "body");
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(parse("---\ntags: [a\n---\nbody").is_err());
    }
}
