//! Tag add/remove on one or many media files.

use std::path::Path;

use gallery_core::actions::{add_tags, batch_tag, remove_tags, TagChanges};

use super::output::print_report;
use super::session::{confirm, fail, Session};
use crate::TagCommand;

pub fn run(config: Option<&Path>, profile: Option<&str>, command: TagCommand) {
    let (args, adding) = match command {
        TagCommand::Add(args) => (args, true),
        TagCommand::Remove(args) => (args, false),
    };
    let mut session = Session::open(config, profile);

    if let [path] = args.paths.as_slice() {
        let result = if adding {
            add_tags(&session.vault, &mut session.index, path, &args.tags)
        } else {
            remove_tags(&session.vault, &mut session.index, path, &args.tags)
        };
        match result {
            Ok(tags) if tags.is_empty() => println!("{path}: (no tags)"),
            Ok(tags) => println!("{path}: {}", tags.join(", ")),
            Err(e) => fail("Error updating tags", e),
        }
        return;
    }

    let changes = if adding {
        TagChanges { add: args.tags.clone(), remove: Vec::new() }
    } else {
        TagChanges { add: Vec::new(), remove: args.tags.clone() }
    };
    let threshold = session.config.gallery.confirm_threshold;
    let yes = args.yes;
    let result = batch_tag(
        &session.vault,
        &mut session.index,
        &args.paths,
        &changes,
        threshold,
        |count| yes || confirm(&format!("Update tags on {count} files?")),
        None,
    );
    match result {
        Ok(report) => print_report("Tagged", &report),
        Err(e) => fail("Error updating tags", e),
    }
}
