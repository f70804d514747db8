//! Query grammar: free-text filter expressions to typed criteria.
//!
//! Two layers:
//! - [`parse_advance_search`] splits a whole query such as
//!   `path:art tag:"drawing -sketch" artist:ann` into groups and writes them
//!   onto a [`SearchState`].
//! - [`parse_filter_info`] turns one group's text into ordered
//!   [`FilterCriterion`]s, stripping the `!`, `-` and `^` modifiers.
//!
//! Neither layer fails: malformed input yields fewer criteria, never an error.

use super::state::SearchState;

/// Per-criterion modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// `-`: a match vetoes the whole group.
    pub negate: bool,
    /// `!`: this criterion must match even when the query is in OR mode.
    pub explicit_and: bool,
    /// `^`: compare case-sensitively regardless of the match-case setting.
    pub case_sensitive: bool,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        !(self.negate || self.explicit_and || self.case_sensitive)
    }
}

/// One filter key with its modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriterion {
    pub modifiers: Modifiers,
    pub key: String,
}

impl FilterCriterion {
    pub fn plain(key: &str) -> Self {
        Self { modifiers: Modifiers::default(), key: key.to_string() }
    }
}

/// Group key for text typed before any `key:` token.
const DEFAULT_GROUP: &str = "tag";

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == ';'
}

fn trim_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '"' || c == '\'')
}

/// Parse a full query into `state`, replacing its path, name, regex, tag and
/// frontmatter-field filters. Other settings are left alone.
pub fn parse_advance_search(raw: &str, state: &mut SearchState) {
    let mut groups: Vec<(String, String)> = Vec::new();
    let mut current: Option<usize> = None;

    for token in raw.split(is_separator).filter(|t| !t.is_empty()) {
        if let Some((key, rest)) = token.split_once(':')
            && !key.is_empty()
        {
            groups.push((key.to_string(), rest.to_string()));
            current = Some(groups.len() - 1);
            continue;
        }

        let idx = match current {
            Some(idx) => idx,
            None => {
                let idx = groups
                    .iter()
                    .position(|(k, _)| k == DEFAULT_GROUP)
                    .unwrap_or_else(|| {
                        groups.push((DEFAULT_GROUP.to_string(), String::new()));
                        groups.len() - 1
                    });
                current = Some(idx);
                idx
            }
        };
        let value = &mut groups[idx].1;
        // ":foo" has an empty key and lands here whole
        let token = token.strip_prefix(':').unwrap_or(token);
        if !value.is_empty() {
            value.push(' ');
        }
        value.push_str(token);
    }

    state.path.clear();
    state.name.clear();
    state.regex.clear();
    state.tag.clear();
    state.front.clear();

    for (key, value) in groups {
        let value = trim_quotes(value.trim()).trim().to_string();
        let slot = match key.as_str() {
            "path" => &mut state.path,
            "name" => &mut state.name,
            "regex" => &mut state.regex,
            "tag" | "tags" => &mut state.tag,
            _ => state.front.entry(key.clone()).or_default(),
        };
        if !slot.is_empty() && !value.is_empty() {
            slot.push(' ');
        }
        slot.push_str(&value);
    }
}

/// Parse one group's text into criteria.
///
/// Keys are whitespace-delimited. Leading modifier characters are stripped
/// and stack: `!` explicit AND, `-` negate, `^` case-sensitive. Keys left
/// empty are dropped. Negated criteria come first, then the other modified
/// criteria, then plain ones; each class keeps input order.
pub fn parse_filter_info(text: &str) -> Vec<FilterCriterion> {
    let mut negated = Vec::new();
    let mut modified = Vec::new();
    let mut plain = Vec::new();

    for raw in text.split_whitespace() {
        let mut key = trim_quotes(raw);
        let mut modifiers = Modifiers::default();

        loop {
            if let Some(rest) = key.strip_prefix('!') {
                modifiers.explicit_and = true;
                key = rest;
            } else if let Some(rest) = key.strip_prefix('-') {
                modifiers.negate = true;
                key = rest;
            } else if let Some(rest) = key.strip_prefix('^') {
                modifiers.case_sensitive = true;
                key = rest;
            } else {
                break;
            }
        }

        let key = trim_quotes(key);
        if key.is_empty() {
            continue;
        }

        let criterion = FilterCriterion { modifiers, key: key.to_string() };
        if modifiers.negate {
            negated.push(criterion);
        } else if !modifiers.is_empty() {
            modified.push(criterion);
        } else {
            plain.push(criterion);
        }
    }

    negated.extend(modified);
    negated.extend(plain);
    negated
}
