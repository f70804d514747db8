#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

//! Media gallery core for markdown vaults: discovery and indexing of images
//! and videos, a filter grammar with scored tag and frontmatter matching,
//! sorting, and grid layout.

pub mod actions;
pub mod config;
pub mod display;
pub mod filter;
pub mod frontmatter;
pub mod grid;
pub mod index;
pub mod info;
pub mod media;
pub mod presets;
pub mod rename;
pub mod search;
pub mod vault;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn rustc_version() -> String {
    std::env::var("RUSTC_VERSION").unwrap_or_else(|_| "unknown".into())
}

pub fn build_info() -> String {
    format!("gallery-core v{} | rustc {} on {}", version(), rustc_version(), std::env::consts::OS)
}
