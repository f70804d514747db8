//! Info command implementation.

use std::path::Path;

use chrono::Local;
use gallery_core::display::InfoBlock;
use gallery_core::info::{media_info, MediaInfo};

use super::output::{format_size, print_json};
use super::session::{fail, Session};
use crate::InfoArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: InfoArgs) {
    let mut session = Session::open(config, profile);
    let info = lookup(&mut session, &args.path, args.create_note);

    if args.json {
        print_json(&info);
    } else {
        print_info(&info, None);
    }
}

/// Collect info for `path`, exiting when it is not an indexed media file.
pub fn lookup(session: &mut Session, path: &str, create_note: bool) -> MediaInfo {
    match media_info(&session.vault, &mut session.index, path, create_note) {
        Ok(Some(info)) => info,
        Ok(None) => fail("Error reading info", format!("not an indexed media file: {path}")),
        Err(e) => fail("Error reading info", e),
    }
}

/// Print the info sections, skipping the ones a block hides.
pub fn print_info(info: &MediaInfo, block: Option<&InfoBlock>) {
    let shows = |section: &str| block.map_or(true, |b| b.shows(section));

    println!("{}", info.path);
    if shows("filename") {
        let name = info.path.rsplit('/').next().unwrap_or(&info.path);
        println!("  Name:      {name}");
    }
    if shows("path") {
        println!("  Path:      {}", info.path);
    }
    if shows("extension") {
        let ext = Path::new(&info.path).extension().and_then(|e| e.to_str()).unwrap_or("");
        let kind = if info.is_video { "video" } else { "image" };
        println!("  Type:      {ext} ({kind})");
    }
    if shows("size") {
        println!("  Size:      {}", format_size(info.size));
    }
    if shows("created") {
        println!("  Created:   {}", info.created.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    }
    if shows("modified") {
        println!("  Modified:  {}", info.modified.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    }
    if shows("tags") {
        if info.tags.is_empty() {
            println!("  Tags:      (none)");
        } else {
            println!("  Tags:      {}", info.tags.join(", "));
        }
    }
    if shows("frontmatter") {
        for (field, values) in &info.fields {
            if field != "tags" {
                println!("  {field}: {}", values.join(", "));
            }
        }
    }
    if shows("metanote") {
        println!("  Meta note: {}", info.meta_note.as_deref().unwrap_or("(none)"));
    }
    if shows("backlinks") {
        if info.backlinks.is_empty() {
            println!("  Backlinks: (none)");
        } else {
            println!("  Backlinks:");
            for note in &info.backlinks {
                println!("    - {note}");
            }
        }
    }
}
