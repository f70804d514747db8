//! Index command implementation.

use std::io::Write;
use std::path::Path;

use gallery_core::index::{Progress, ProgressCallback};

use super::session::{load_config, Session};
use crate::IndexArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: IndexArgs) {
    let verbose = args.verbose;
    let limit = args.limit;

    let progress: ProgressCallback = Box::new(move |current: usize, total: usize, path: &str| {
        if limit.is_some_and(|limit| current > limit) {
            return Progress::Cancel;
        }
        if verbose {
            println!("[{}/{}] {}", current, total, path);
        } else if current % 50 == 0 || current == total {
            print!("\rIndexing... {}/{}", current, total);
            std::io::stdout().flush().ok();
        }
        Progress::Continue
    });

    let rc = load_config(config, profile);
    println!("Indexing vault: {}", rc.vault_root.display());

    let (session, stats) = Session::build(rc, Some(progress));

    if !verbose {
        println!(); // Newline after progress
    }
    println!();
    println!("Indexing complete:");
    println!("  Files found:    {}", stats.files_found);
    println!("  Media indexed:  {}", stats.media_indexed);
    match session.index.meta_folder() {
        Some(folder) => {
            println!("  Meta folder:    {folder}");
            println!("  Notes linked:   {}", stats.notes_linked);
            if stats.notes_skipped > 0 {
                println!("  Notes skipped:  {}", stats.notes_skipped);
            }
        }
        None => println!("  Meta folder:    (none, tag and field filters disabled)"),
    }
    println!("  Duration:       {}ms", stats.duration_ms);
    if stats.cancelled {
        println!();
        println!("Metadata scan stopped early; the index is partial.");
    }
}
