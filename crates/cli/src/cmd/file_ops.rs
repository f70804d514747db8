//! Rename, copy and delete of media files.

use std::path::Path;

use gallery_core::actions::{batch_delete, copy_media, delete_media, rename_media};

use super::output::print_report;
use super::session::{confirm, fail, Session};
use crate::{CopyArgs, DeleteArgs, RenameArgs};

pub fn rename(config: Option<&Path>, profile: Option<&str>, args: RenameArgs) {
    let mut session = Session::open(config, profile);
    let note = session.index.meta_note_for(&args.from).map(str::to_string);

    match rename_media(&session.vault, &mut session.index, &args.from, &args.to) {
        Ok(to) => {
            println!("Renamed: {} -> {}", args.from, to);
            if let Some(note) = note {
                println!("Metadata note updated: {note}");
            }
        }
        Err(e) => fail("Error renaming", e),
    }
}

pub fn copy(config: Option<&Path>, profile: Option<&str>, args: CopyArgs) {
    let mut session = Session::open(config, profile);
    match copy_media(&session.vault, &mut session.index, &args.from, args.to.as_deref()) {
        Ok(to) => println!("Copied: {} -> {}", args.from, to),
        Err(e) => fail("Error copying", e),
    }
}

/// One path is a plain delete that keeps the metadata note; several paths
/// delete each file together with its note.
pub fn delete(config: Option<&Path>, profile: Option<&str>, args: DeleteArgs) {
    let mut session = Session::open(config, profile);

    if let [path] = args.paths.as_slice() {
        let note = session.index.meta_note_for(path).map(str::to_string);
        if let Err(e) = delete_media(&session.vault, &mut session.index, path) {
            fail("Error deleting", e);
        }
        println!("Deleted: {path}");
        if let Some(note) = note {
            println!("Metadata note kept: {note}");
        }
        return;
    }

    let threshold = session.config.gallery.confirm_threshold;
    let yes = args.yes;
    let result = batch_delete(
        &session.vault,
        &mut session.index,
        &args.paths,
        threshold,
        |count| yes || confirm(&format!("Delete {count} files and their metadata notes?")),
        None,
    );
    match result {
        Ok(report) => print_report("Deleted", &report),
        Err(e) => fail("Error deleting", e),
    }
}
