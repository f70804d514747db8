//! Named filter presets.

use std::path::Path;

use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::output::{print_json, truncate};
use super::session::{build_search, fail, load_config, open_presets};
use crate::PresetCommand;

#[derive(Tabled)]
struct PresetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Filter")]
    filter: String,
}

#[derive(Serialize)]
struct PresetOutput<'a> {
    name: &'a str,
    filter: &'a str,
}

pub fn run(config: Option<&Path>, profile: Option<&str>, command: PresetCommand) {
    let rc = load_config(config, profile);
    let mut store = open_presets(&rc);

    match command {
        PresetCommand::Save { name, filter } => {
            let name = name.trim();
            if name.is_empty() {
                fail("Error saving preset", "name must not be empty");
            }
            let block = build_search(&rc, &filter).get_filter();
            let replaced = store.upsert(name, block);
            if let Err(e) = store.save() {
                fail("Error saving preset", e);
            }
            if replaced {
                println!("Updated preset '{name}'");
            } else {
                println!("Saved preset '{name}'");
            }
        }
        PresetCommand::List { json } => {
            if json {
                let output: Vec<PresetOutput> = store
                    .presets()
                    .iter()
                    .map(|p| PresetOutput { name: &p.name, filter: &p.filter })
                    .collect();
                print_json(&output);
                return;
            }
            if store.presets().is_empty() {
                println!("(no presets saved)");
                return;
            }
            let rows: Vec<PresetRow> = store
                .presets()
                .iter()
                .map(|p| PresetRow { name: p.name.clone(), filter: summarize(&p.filter) })
                .collect();
            println!("{}", Table::new(&rows).with(Style::rounded()));
        }
        PresetCommand::Show { name } => match store.get(&name) {
            Some(preset) => println!("{}", preset.filter),
            None => fail("Error showing preset", format!("no preset named '{name}'")),
        },
        PresetCommand::Remove { name } => {
            if !store.remove(&name) {
                fail("Error removing preset", format!("no preset named '{name}'"));
            }
            if let Err(e) = store.save() {
                fail("Error removing preset", e);
            }
            println!("Removed preset '{name}'");
        }
    }
}

/// One-line view of the non-empty filter lines of a block.
fn summarize(block: &str) -> String {
    let parts: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("```"))
        .filter(|line| line.split_once(':').is_some_and(|(_, v)| !v.trim().is_empty()))
        .filter(|line| !matches!(*line, "matchCase:false" | "exclusive:false" | "reverseOrder:false" | "random:0"))
        .collect();
    truncate(&parts.join(" "), 60)
}
