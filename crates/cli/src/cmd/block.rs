//! Render the gallery blocks embedded in a note.

use std::path::Path;

use gallery_core::display::{parse_display_block, DisplayBlock, GRID_BLOCK, INFO_BLOCK};
use gallery_core::grid::{LayoutOutcome, MediaGrid};
use gallery_core::info::media_info;
use gallery_core::search::MediaSearch;

use super::info::print_info;
use super::layout::print_grid;
use super::session::{read_input, Session};
use crate::BlockArgs;

/// A fenced block: language tag and body.
#[derive(Debug, PartialEq)]
struct Fence {
    language: String,
    body: String,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: BlockArgs) {
    let mut session = Session::open(config, profile);
    let text = read_input(&args.note);
    let blocks = gallery_fences(&text);

    if blocks.is_empty() {
        println!("(no gallery blocks found)");
        return;
    }

    for (i, fence) in blocks.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("== {} block {} ==", fence.language, i + 1);

        match parse_display_block(&fence.language, &fence.body) {
            Err(usage) => println!("{usage}"),
            Ok(DisplayBlock::Grid(state)) => {
                let mut search = MediaSearch::new(state);
                let mut rng = fastrand::Rng::new();
                if let Err(e) = search.update_data(&session.index, &mut rng) {
                    println!("{e}");
                    continue;
                }
                let mut grid = MediaGrid::new();
                match grid.update_display(&mut search, args.width) {
                    LayoutOutcome::Rebuilt(report) => print_grid(&grid, search.len(), &report),
                    _ => println!("(container has no width)"),
                }
            }
            Ok(DisplayBlock::Info(block)) => {
                match media_info(&session.vault, &mut session.index, &block.img_path, false) {
                    Ok(Some(info)) => print_info(&info, Some(&block)),
                    Ok(None) => println!("not an indexed media file: {}", block.img_path),
                    Err(e) => println!("{e}"),
                }
            }
        }
    }
}

/// Collect ` ```gallery ` and ` ```gallery-info ` fences in document order.
fn gallery_fences(text: &str) -> Vec<Fence> {
    let mut fences = Vec::new();
    let mut current: Option<Fence> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if current.is_some() {
            if trimmed == "```" {
                fences.extend(current.take());
            } else if let Some(fence) = current.as_mut() {
                fence.body.push_str(line);
                fence.body.push('\n');
            }
        } else if let Some(language) = trimmed.strip_prefix("```") {
            let language = language.trim();
            if language == GRID_BLOCK || language == INFO_BLOCK {
                current = Some(Fence { language: language.to_string(), body: String::new() });
            }
        }
    }
    fences
}
