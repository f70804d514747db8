//! Arguments of the ` ```gallery ` and ` ```gallery-info ` display blocks.
//!
//! Both blocks use one `key=value` pair per line. Unknown keys are ignored;
//! a missing required key yields a [`UsageError`] whose message is the usage
//! text to show in place of the block.

use thiserror::Error;

use crate::filter::SearchState;

/// Language tag of the grid block.
pub const GRID_BLOCK: &str = "gallery";
/// Language tag of the info block.
pub const INFO_BLOCK: &str = "gallery-info";

pub const GRID_USAGE: &str = "\
Usage:
```gallery
type=grid
path=<folder prefix>
name=<name patterns>
tags=<tag filter>
regex=<template with {PATH} and {NAME}>
matchCase=<true|false>
exclusive=<true|false>
sort=<UNSORTED|NAME|PATH|CDATE|MDATE|SIZE>
reverseOrder=<true|false>
random=<sample size>
imgWidth=<max item width>
imgHeight=<max item height>
customList=<indices, e.g. 0 2 5>
```";

pub const INFO_USAGE: &str = "\
Usage:
```gallery-info
imgPath=<vault path of the image>
ignoreInfo=<comma separated sections to hide: filename, path, extension,
  size, created, modified, tags, frontmatter, metanote, backlinks>
```";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("missing `type`\n{usage}", usage = GRID_USAGE)]
    MissingType,

    #[error("unknown gallery type '{0}'\n{usage}", usage = GRID_USAGE)]
    UnknownType(String),

    #[error("missing `imgPath`\n{usage}", usage = INFO_USAGE)]
    MissingImgPath,

    #[error("unknown block language '{0}'")]
    UnknownBlock(String),
}

/// A parsed display block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayBlock {
    Grid(SearchState),
    Info(InfoBlock),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoBlock {
    pub img_path: String,
    /// Section names (lowercased) not to show.
    pub ignore_info: Vec<String>,
}

impl InfoBlock {
    pub fn shows(&self, section: &str) -> bool {
        !self.ignore_info.iter().any(|s| s.eq_ignore_ascii_case(section))
    }
}

/// Split block text into `(key, value)` pairs in line order.
pub fn block_args(text: &str) -> Vec<(&str, &str)> {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

/// Parse a block by its language tag.
pub fn parse_display_block(language: &str, text: &str) -> Result<DisplayBlock, UsageError> {
    match language.trim() {
        GRID_BLOCK => parse_grid_block(text).map(DisplayBlock::Grid),
        INFO_BLOCK => parse_info_block(text).map(DisplayBlock::Info),
        other => Err(UsageError::UnknownBlock(other.to_string())),
    }
}

/// Parse a ` ```gallery ` block into the search it displays.
pub fn parse_grid_block(text: &str) -> Result<SearchState, UsageError> {
    let mut state = SearchState::default();
    let mut kind = None;

    for (key, value) in block_args(text) {
        match key.to_lowercase().as_str() {
            "type" => kind = Some(value.to_lowercase()),
            "path" => state.path = value.to_string(),
            "name" => state.name = value.to_string(),
            "tags" | "tag" => state.tag = value.to_string(),
            "regex" => state.regex = value.to_string(),
            "matchcase" => state.match_case = value.eq_ignore_ascii_case("true"),
            "exclusive" => state.exclusive = value.eq_ignore_ascii_case("true"),
            "sort" => state.sort = value.parse().unwrap_or_default(),
            "reverseorder" => state.reverse = value.eq_ignore_ascii_case("true"),
            "random" => state.random = value.parse().unwrap_or(0),
            "imgwidth" => {
                if let Ok(width) = value.parse::<u32>()
                    && width > 0
                {
                    state.max_width = width;
                }
            }
            "imgheight" => state.max_height = value.parse().ok().filter(|h| *h > 0),
            "customlist" => state.custom_list = parse_index_list(value),
            _ => tracing::debug!("ignoring gallery block key '{key}'"),
        }
    }

    match kind.as_deref() {
        Some("grid") => Ok(state),
        Some(other) => Err(UsageError::UnknownType(other.to_string())),
        None => Err(UsageError::MissingType),
    }
}

/// Parse a ` ```gallery-info ` block.
pub fn parse_info_block(text: &str) -> Result<InfoBlock, UsageError> {
    let mut img_path = None;
    let mut ignore_info = Vec::new();

    for (key, value) in block_args(text) {
        match key.to_lowercase().as_str() {
            "imgpath" if !value.is_empty() => img_path = Some(value.to_string()),
            "ignoreinfo" => {
                ignore_info = value
                    .split([',', ';'])
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            _ => {}
        }
    }

    let img_path = img_path.ok_or(UsageError::MissingImgPath)?;
    Ok(InfoBlock { img_path, ignore_info })
}

fn parse_index_list(value: &str) -> Vec<usize> {
    value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}
