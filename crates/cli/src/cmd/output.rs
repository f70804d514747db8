//! Shared output formatting for listing commands.

use gallery_core::actions::BatchReport;
use gallery_core::index::{MediaResource, ResourceIndex};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::OutputFormat;

/// Media file for JSON output.
#[derive(Debug, Serialize)]
pub struct MediaOutput {
    pub path: String,
    pub locator: String,
    pub size: u64,
    pub modified: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_note: Option<String>,
}

impl MediaOutput {
    pub fn new(resource: &MediaResource, index: &ResourceIndex) -> Self {
        Self {
            path: resource.path.clone(),
            locator: resource.key.clone(),
            size: resource.stat.size,
            modified: resource.stat.modified.format("%Y-%m-%d %H:%M").to_string(),
            tags: index.metadata_for(&resource.path).map(|m| m.tags.clone()).unwrap_or_default(),
            meta_note: index.meta_note_for(&resource.path).map(str::to_string),
        }
    }
}

#[derive(Tabled)]
struct MediaRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

/// Pick the output format, letting `--json` and `--quiet` override `--output`.
pub fn resolve_format(output: OutputFormat, json: bool, quiet: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else if quiet {
        OutputFormat::Quiet
    } else {
        output
    }
}

pub fn print_media(items: &[MediaOutput], format: OutputFormat) {
    match format {
        OutputFormat::Table => print_media_table(items),
        OutputFormat::Json => print_json(&items),
        OutputFormat::Quiet => {
            for item in items {
                println!("{}", item.path);
            }
        }
    }
}

fn print_media_table(items: &[MediaOutput]) {
    if items.is_empty() {
        println!("(no media found)");
        return;
    }

    let rows: Vec<MediaRow> = items
        .iter()
        .enumerate()
        .map(|(i, item)| MediaRow {
            position: i + 1,
            path: truncate(&item.path, 60),
            size: format_size(item.size),
            modified: item.modified.clone(),
            tags: truncate(&item.tags.join(", "), 40),
        })
        .collect();

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{}", table);
    println!("\n-- {} media --", items.len());
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

/// Shorten to at most `max_len` characters, marking the cut with `...`.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Print a batch summary; exits with status 1 when any item failed.
pub fn print_report(verb: &str, report: &BatchReport) {
    for path in &report.succeeded {
        println!("{verb}: {path}");
    }
    for (path, error) in &report.failed {
        eprintln!("Failed: {path}: {error}");
    }
    if report.cancelled {
        println!("Cancelled with {} items left", report.skipped);
    }
    println!("{} succeeded, {} failed", report.succeeded.len(), report.failed.len());
    if !report.failed.is_empty() {
        std::process::exit(1);
    }
}
