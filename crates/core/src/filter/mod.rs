//! Filtering: query grammar, match engine and search state.
//!
//! A query flows through three steps:
//! - [`grammar`] parses user text into a [`SearchState`] and criteria
//! - [`matcher`] compiles the state into a [`MatchQuery`] and evaluates
//!   each indexed resource against it
//! - [`state`] round-trips the state through a fenced text block for
//!   copy-paste and named presets

pub mod grammar;
pub mod matcher;
pub mod state;

pub use grammar::{FilterCriterion, Modifiers, parse_advance_search, parse_filter_info};
pub use matcher::{
    DEFAULT_TEMPLATE, MatchQuery, SCORE_FAIL, SCORE_NEUTRAL, SCORE_PASS, build_name_regexes,
    evaluate, score_group,
};
pub use state::{DEFAULT_ITEM_WIDTH, FILTER_BLOCK_MARKER, SearchState, SortKey};
