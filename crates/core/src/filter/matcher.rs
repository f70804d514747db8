//! Match engine: path/name regexes plus signed scoring of tag and
//! frontmatter criteria.

use regex::{Regex, RegexBuilder};

use super::grammar::{FilterCriterion, parse_filter_info};
use super::state::SearchState;
use crate::index::NoteMetadata;

/// Contribution of a group that vetoes the resource.
pub const SCORE_FAIL: i64 = -1_000_000;
/// Contribution of a satisfied group.
pub const SCORE_PASS: i64 = 1;
/// Contribution of a group without criteria.
pub const SCORE_NEUTRAL: i64 = 0;

/// Template used when no custom regex is given. `{NAME}` must sit in the
/// basename, `{PATH}` anchors at the start of the vault path.
pub const DEFAULT_TEMPLATE: &str = "^{PATH}.*{NAME}[^/]*$";

/// Build one regex per whitespace-separated name token.
///
/// Tokens whose pattern does not compile are skipped with a warning, so a bad
/// token matches nothing instead of failing the search.
pub fn build_name_regexes(
    path: &str,
    name: &str,
    template: Option<&str>,
    match_case: bool,
) -> Vec<Regex> {
    let template = template.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TEMPLATE);
    let path = path.trim();
    let path = if path == "/" { "" } else { path };

    let mut names: Vec<&str> = name.split_whitespace().collect();
    if names.is_empty() {
        names.push("");
    }

    names
        .into_iter()
        .filter_map(|n| {
            let pattern = template.replace("{PATH}", path).replace("{NAME}", n);
            match RegexBuilder::new(&pattern).case_insensitive(!match_case).build() {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("invalid filter pattern '{pattern}', token ignored: {e}");
                    None
                }
            }
        })
        .collect()
}

fn contains(value: &str, key: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        value.contains(key)
    } else {
        value.to_lowercase().contains(&key.to_lowercase())
    }
}

/// Score one criteria group against one value list.
///
/// - no criteria: [`SCORE_NEUTRAL`]
/// - criteria but no value list: [`SCORE_FAIL`]
/// - a negated criterion matching: [`SCORE_FAIL`] at once
/// - a plain match outside AND mode: [`SCORE_PASS`] at once
/// - an AND-mode criterion (global `exclusive` or its own `!`) not matching:
///   [`SCORE_FAIL`] at once
///
/// After the scan a group with only negations passes, and a group passes if
/// an AND-mode criterion matched (all of them did, or the scan would have
/// stopped). Everything else fails.
pub fn score_group(
    criteria: &[FilterCriterion],
    values: Option<&[String]>,
    match_case: bool,
    exclusive: bool,
) -> i64 {
    if criteria.is_empty() {
        return SCORE_NEUTRAL;
    }
    let Some(values) = values else {
        return SCORE_FAIL;
    };

    let mut has_positive = false;
    let mut and_matched = false;

    for criterion in criteria {
        let case_sensitive = match_case || criterion.modifiers.case_sensitive;
        let matched = values.iter().any(|v| contains(v, &criterion.key, case_sensitive));

        if criterion.modifiers.negate {
            if matched {
                return SCORE_FAIL;
            }
            continue;
        }

        has_positive = true;
        let and_mode = exclusive || criterion.modifiers.explicit_and;
        match (matched, and_mode) {
            (true, false) => return SCORE_PASS,
            (true, true) => and_matched = true,
            (false, true) => return SCORE_FAIL,
            (false, false) => {}
        }
    }

    if !has_positive || and_matched { SCORE_PASS } else { SCORE_FAIL }
}

/// Decide whether a resource is retained.
///
/// The path must match one of `regexes`. Then the tag group and every field
/// group are scored and summed; with no criteria at all the resource is kept,
/// otherwise the total must be positive.
pub fn evaluate(
    path: &str,
    regexes: &[Regex],
    tag_criteria: &[FilterCriterion],
    field_criteria: &[(String, Vec<FilterCriterion>)],
    metadata: Option<&NoteMetadata>,
    match_case: bool,
    exclusive: bool,
) -> bool {
    if !regexes.iter().any(|re| re.is_match(path)) {
        return false;
    }

    if tag_criteria.is_empty() && field_criteria.iter().all(|(_, c)| c.is_empty()) {
        return true;
    }

    let tags = metadata.map(|m| m.tags.as_slice());
    let mut score = score_group(tag_criteria, tags, match_case, exclusive);

    for (field, criteria) in field_criteria {
        let values = metadata.and_then(|m| m.fields.get(field)).map(Vec::as_slice);
        score += score_group(criteria, values, match_case, exclusive);
    }

    score > 0
}

/// A [`SearchState`] compiled for repeated evaluation.
#[derive(Debug, Clone)]
pub struct MatchQuery {
    regexes: Vec<Regex>,
    tag_criteria: Vec<FilterCriterion>,
    field_criteria: Vec<(String, Vec<FilterCriterion>)>,
    match_case: bool,
    exclusive: bool,
}

impl MatchQuery {
    pub fn from_state(state: &SearchState) -> Self {
        let template = (!state.regex.trim().is_empty()).then_some(state.regex.as_str());
        let field_criteria = state
            .front
            .iter()
            .map(|(field, text)| (field.clone(), parse_filter_info(text)))
            .filter(|(_, criteria)| !criteria.is_empty())
            .collect();

        Self {
            regexes: build_name_regexes(&state.path, &state.name, template, state.match_case),
            tag_criteria: parse_filter_info(&state.tag),
            field_criteria,
            match_case: state.match_case,
            exclusive: state.exclusive,
        }
    }

    /// Whether the query needs metadata at all.
    pub fn uses_metadata(&self) -> bool {
        !self.tag_criteria.is_empty() || !self.field_criteria.is_empty()
    }

    pub fn evaluate(&self, path: &str, metadata: Option<&NoteMetadata>) -> bool {
        evaluate(
            path,
            &self.regexes,
            &self.tag_criteria,
            &self.field_criteria,
            metadata,
            self.match_case,
            self.exclusive,
        )
    }
}
