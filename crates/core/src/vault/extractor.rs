//! Note content extraction: embeds, tags and frontmatter fields.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_yaml::Value;

use crate::frontmatter::{self, Frontmatter};

/// Extracted information from a note file.
#[derive(Debug, Clone, Default)]
pub struct ExtractedNote {
    /// Embedded targets in document order, raw as written.
    pub embeds: Vec<ExtractedEmbed>,
    /// Tags from frontmatter `tags`/`tag` and inline `#tags`, without `#`.
    pub tags: Vec<String>,
    /// Every frontmatter field flattened to a list of strings.
    pub fields: BTreeMap<String, Vec<String>>,
}

/// An embed (`![[target]]` or `![alt](target)`) found in a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEmbed {
    /// Target path/name (as written, `%20` decoded for markdown embeds).
    pub target: String,
    /// Line number where the embed appears (1-based).
    pub line_number: u32,
}

static WIKI_EMBED_RE: LazyLock<Regex> = LazyLock::new(|| {
    // ![[target]], ![[target|size]], ![[target#frag]]
    Regex::new(r"!\[\[([^\]|#]+)(?:[#|][^\]]*)?\]\]").unwrap()
});

static MARKDOWN_EMBED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\(<?([^)>]+)>?\)").unwrap());

static INLINE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([\p{L}\p{N}_/-]+)").unwrap());

/// Extract embeds, tags and fields from note content.
pub fn extract_note(content: &str) -> ExtractedNote {
    let parsed = frontmatter::parse(content).unwrap_or_else(|e| {
        tracing::debug!("unreadable frontmatter, treating as body: {e}");
        crate::frontmatter::ParsedDocument { frontmatter: None, body: content.to_string() }
    });

    let fields = parsed.frontmatter.as_ref().map(frontmatter_fields).unwrap_or_default();

    let mut tags: Vec<String> = Vec::new();
    for key in ["tags", "tag"] {
        if let Some(values) = parsed.frontmatter.as_ref().and_then(|fm| fm.fields.get(key)) {
            for tag in value_to_tags(values) {
                push_unique(&mut tags, tag);
            }
        }
    }
    for cap in INLINE_TAG_RE.captures_iter(&parsed.body) {
        push_unique(&mut tags, cap[1].to_string());
    }

    ExtractedNote { embeds: extract_embeds(content), tags, fields }
}

/// Extract embeds from the whole document, in order of appearance.
pub fn extract_embeds(content: &str) -> Vec<ExtractedEmbed> {
    let mut embeds = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_number = (line_num + 1) as u32;
        let mut found: Vec<(usize, String)> = Vec::new();

        for cap in WIKI_EMBED_RE.captures_iter(line) {
            if let Some(m) = cap.get(1) {
                found.push((m.start(), m.as_str().trim().to_string()));
            }
        }

        for cap in MARKDOWN_EMBED_RE.captures_iter(line) {
            if let Some(m) = cap.get(1) {
                let url = m.as_str().trim();
                if url.starts_with("http://") || url.starts_with("https://") {
                    continue;
                }
                found.push((m.start(), url.replace("%20", " ")));
            }
        }

        found.sort_by_key(|(pos, _)| *pos);
        embeds.extend(
            found.into_iter().map(|(_, target)| ExtractedEmbed { target, line_number }),
        );
    }

    embeds
}

/// Flatten frontmatter fields to string lists.
pub fn frontmatter_fields(fm: &Frontmatter) -> BTreeMap<String, Vec<String>> {
    fm.fields.iter().map(|(k, v)| (k.clone(), value_to_strings(v))).collect()
}

/// Flatten a YAML value to its scalar strings. Nulls and maps yield nothing.
pub fn value_to_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Null | Value::Mapping(_) => Vec::new(),
        Value::Bool(b) => vec![b.to_string()],
        Value::Number(n) => vec![n.to_string()],
        Value::String(s) => vec![s.clone()],
        Value::Sequence(items) => items.iter().flat_map(value_to_strings).collect(),
        Value::Tagged(tagged) => value_to_strings(&tagged.value),
    }
}

fn value_to_tags(value: &Value) -> Vec<String> {
    match value {
        // `tags: a, b c` is a single string in YAML
        Value::String(s) => s
            .split([',', ' '])
            .map(|t| t.trim().trim_start_matches('#'))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        other => value_to_strings(other)
            .into_iter()
            .map(|t| t.trim().trim_start_matches('#').to_string())
            .filter(|t| !t.is_empty())
            .collect(),
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}
