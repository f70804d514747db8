//! The search state and its fenced-block serialization.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marker opening a serialized filter block.
pub const FILTER_BLOCK_MARKER: &str = "```gallery-search";

/// Default maximum item width in pixels.
pub const DEFAULT_ITEM_WIDTH: u32 = 200;

/// Sort order of the gallery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortKey {
    /// Discovery order.
    #[default]
    Unsorted,
    Name,
    Path,
    /// Creation date, newest first.
    CDate,
    /// Modification date, newest first.
    MDate,
    /// File size, largest first.
    Size,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unsorted => "UNSORTED",
            Self::Name => "NAME",
            Self::Path => "PATH",
            Self::CDate => "CDATE",
            Self::MDate => "MDATE",
            Self::Size => "SIZE",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "" | "UNSORTED" => Ok(Self::Unsorted),
            "NAME" => Ok(Self::Name),
            "PATH" => Ok(Self::Path),
            "CDATE" => Ok(Self::CDate),
            "MDATE" => Ok(Self::MDate),
            "SIZE" => Ok(Self::Size),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

/// Everything the user currently wants to see in one gallery view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    /// Path prefix pattern.
    pub path: String,
    /// Whitespace-separated basename patterns.
    pub name: String,
    /// Custom regex template with `{PATH}`/`{NAME}` placeholders.
    pub regex: String,
    /// Tag filter text.
    pub tag: String,
    /// Filter text per frontmatter field.
    pub front: BTreeMap<String, String>,
    pub match_case: bool,
    /// AND semantics for every criteria group.
    pub exclusive: bool,
    pub sort: SortKey,
    pub reverse: bool,
    /// Random sample size; 0 disables sampling.
    pub random: usize,
    /// Explicit indices into the filtered list.
    pub custom_list: Vec<usize>,
    pub max_width: u32,
    pub max_height: Option<u32>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            path: String::new(),
            name: String::new(),
            regex: String::new(),
            tag: String::new(),
            front: BTreeMap::new(),
            match_case: false,
            exclusive: false,
            sort: SortKey::Unsorted,
            reverse: false,
            random: 0,
            custom_list: Vec::new(),
            max_width: DEFAULT_ITEM_WIDTH,
            max_height: None,
        }
    }
}

impl SearchState {
    /// Reset every filter. Sort and sizing are kept.
    pub fn clear_filter(&mut self) {
        self.path.clear();
        self.name.clear();
        self.regex.clear();
        self.tag.clear();
        self.front.clear();
        self.match_case = false;
        self.exclusive = false;
        self.random = 0;
        self.custom_list.clear();
    }

    /// Serialize to a fenced `key:value` block.
    pub fn get_filter(&self) -> String {
        let one_line = |s: &str| s.replace(['\r', '\n'], " ");
        let mut out = String::new();
        out.push_str(FILTER_BLOCK_MARKER);
        out.push('\n');
        out.push_str(&format!("path:{}\n", one_line(&self.path)));
        out.push_str(&format!("name:{}\n", one_line(&self.name)));
        out.push_str(&format!("tags:{}\n", one_line(&self.tag)));
        out.push_str(&format!("regex:{}\n", one_line(&self.regex)));
        out.push_str(&format!("matchCase:{}\n", self.match_case));
        out.push_str(&format!("exclusive:{}\n", self.exclusive));
        out.push_str(&format!("imgWidth:{}\n", self.max_width));
        out.push_str(&format!("sort:{}\n", self.sort));
        out.push_str(&format!("reverseOrder:{}\n", self.reverse));
        out.push_str(&format!("random:{}\n", self.random));
        for (field, text) in &self.front {
            out.push_str(&format!("{}:{}\n", field, one_line(text)));
        }
        out.push_str("```");
        out
    }

    /// Load a block written by [`SearchState::get_filter`].
    ///
    /// Reads `key:value` and legacy `key=value` lines; fence lines and blank
    /// lines are skipped. Filters not present in the block are cleared.
    /// Unknown keys become frontmatter-field filters.
    pub fn set_filter(&mut self, text: &str) {
        self.clear_filter();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("```") {
                continue;
            }
            let Some(split) = line.find([':', '=']) else {
                tracing::debug!("skipping filter line without delimiter: {line}");
                continue;
            };
            let key = line[..split].trim();
            let value = line[split + 1..].trim();
            if key.is_empty() {
                continue;
            }

            // fixed keys match their written spelling; anything else,
            // including `Name` or `Tags`, is a frontmatter field
            match key {
                "path" => self.path = value.to_string(),
                "name" => self.name = value.to_string(),
                "tags" | "tag" => self.tag = value.to_string(),
                "regex" => self.regex = value.to_string(),
                "matchCase" => self.match_case = parse_bool(value),
                "exclusive" => self.exclusive = parse_bool(value),
                "imgWidth" => match value.parse() {
                    Ok(w) if w > 0 => self.max_width = w,
                    _ => tracing::warn!("ignoring invalid imgWidth '{value}'"),
                },
                "sort" => match value.parse() {
                    Ok(sort) => self.sort = sort,
                    Err(e) => tracing::warn!("ignoring sort: {e}"),
                },
                "reverseOrder" => self.reverse = parse_bool(value),
                "random" => self.random = value.parse().unwrap_or(0),
                _ => {
                    self.front.insert(key.to_string(), value.to_string());
                }
            }
        }
    }
}

fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_state() -> SearchState {
        let mut state = SearchState {
            path: "art/ink".into(),
            name: "cat dog".into(),
            regex: String::new(),
            tag: "drawing -sketch".into(),
            match_case: true,
            exclusive: false,
            sort: SortKey::MDate,
            reverse: true,
            random: 3,
            max_width: 250,
            ..Default::default()
        };
        state.front.insert("artist".into(), "ann !lee".into());
        state.front.insert("year".into(), "2021".into());
        state
    }

    #[test]
    fn filter_block_format() {
        insta::assert_snapshot!(sample_state().get_filter(), @r"
        ```gallery-search
        path:art/ink
        name:cat dog
        tags:drawing -sketch
        regex:
        matchCase:true
        exclusive:false
        imgWidth:250
        sort:MDATE
        reverseOrder:true
        random:3
        artist:ann !lee
        year:2021
        ```
        ");
    }

    #[test]
    fn round_trip_colon_format() {
        let state = sample_state();
        let mut restored = SearchState::default();
        restored.set_filter(&state.get_filter());
        assert_eq!(restored, state);
    }

    #[test]
    fn round_trip_legacy_equals_format() {
        let state = sample_state();
        let legacy: String = state
            .get_filter()
            .lines()
            .map(|l| if l.starts_with("```") { l.to_string() } else { l.replacen(':', "=", 1) })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(legacy.contains("path=art/ink"));

        let mut restored = SearchState::default();
        restored.set_filter(&legacy);
        assert_eq!(restored, state);
    }

    #[test]
    fn round_trip_keeps_fields_named_like_fixed_keys() {
        let mut state = SearchState { name: "cat".into(), tag: "ink".into(), ..Default::default() };
        state.front.insert("Name".into(), "Ann".into());
        state.front.insert("Tags".into(), "x".into());
        state.front.insert("Random".into(), "7".into());

        let mut restored = SearchState::default();
        restored.set_filter(&state.get_filter());
        assert_eq!(restored, state);
    }

    #[test]
    fn regex_values_keep_inner_delimiters() {
        let mut state = SearchState::default();
        state.set_filter("regex:^{PATH}.*=x:{NAME}$\npath=a:b");
        assert_eq!(state.regex, "^{PATH}.*=x:{NAME}$");
        assert_eq!(state.path, "a:b");
    }

    #[test]
    fn set_filter_clears_previous_filters() {
        let mut state = sample_state();
        state.set_filter("```gallery-search\ntags:cat\n```");
        assert_eq!(state.tag, "cat");
        assert!(state.path.is_empty());
        assert!(state.front.is_empty());
        assert_eq!(state.random, 0);
        // sort and width are not filters
        assert_eq!(state.sort, SortKey::MDate);
        assert_eq!(state.max_width, 250);
    }

    #[rstest]
    #[case("name", SortKey::Name)]
    #[case("CDATE", SortKey::CDate)]
    #[case("Size", SortKey::Size)]
    #[case("", SortKey::Unsorted)]
    fn sort_key_parses_case_insensitively(#[case] input: &str, #[case] expected: SortKey) {
        assert_eq!(input.parse::<SortKey>().unwrap(), expected);
    }

    #[test]
    fn unknown_sort_key_is_error() {
        assert!("shuffle".parse::<SortKey>().is_err());
    }
}
