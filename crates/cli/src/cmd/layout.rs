//! Layout command: place matching media into grid columns.

use std::path::Path;

use gallery_core::grid::{LayoutOutcome, MediaGrid, RebuildReport};
use serde::Serialize;

use super::output::{print_json, truncate};
use super::session::{fail, Session};
use crate::LayoutArgs;

#[derive(Serialize)]
struct ColumnOutput<'a> {
    width: f64,
    items: Vec<&'a str>,
}

#[derive(Serialize)]
struct LayoutOutput<'a> {
    columns: Vec<ColumnOutput<'a>>,
    column_width: f64,
    max_height: Option<u32>,
    lazy_load: usize,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, args: LayoutArgs) {
    let session = Session::open(config, profile);
    let mut search = session.search(&args.filter);
    if let Some(width) = args.item_width {
        search.set_max_width(width);
    }
    if args.item_height.is_some() {
        search.set_max_height(args.item_height);
    }

    let mut grid = MediaGrid::new();
    let report = match grid.update_display(&mut search, args.width) {
        LayoutOutcome::Rebuilt(report) => report,
        LayoutOutcome::Deferred => fail("Error laying out grid", "container width must be a positive number"),
        other => fail("Error laying out grid", format!("unexpected outcome {other:?}")),
    };

    if args.json {
        let output = LayoutOutput {
            columns: grid
                .columns()
                .iter()
                .map(|c| ColumnOutput {
                    width: c.width,
                    items: c.items.iter().map(|i| i.path.as_str()).collect(),
                })
                .collect(),
            column_width: report.column_width,
            max_height: search.state().max_height,
            lazy_load: report.lazy_load.len(),
        };
        print_json(&output);
        return;
    }

    print_grid(&grid, search.len(), &report);
}

/// Print each column with its items.
pub fn print_grid(grid: &MediaGrid, total: usize, report: &RebuildReport) {
    println!(
        "{} media in {} columns of {:.1}px",
        total,
        report.columns,
        report.column_width
    );
    for (i, column) in grid.columns().iter().enumerate() {
        println!();
        println!("Column {} ({} items)", i + 1, column.items.len());
        for item in &column.items {
            let marker = if item.is_video { "video" } else { "image" };
            println!("  [{marker}] {}", truncate(&item.path, 70));
        }
    }
}
