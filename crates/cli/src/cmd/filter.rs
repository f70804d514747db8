//! Filter block export and import.

use std::path::Path;

use super::output::{print_media, MediaOutput};
use super::session::{build_search, load_config, Session};
use crate::{FilterArgs, FilterCommand, OutputFormat};

pub fn run(config: Option<&Path>, profile: Option<&str>, command: FilterCommand) {
    match command {
        FilterCommand::Export(args) => {
            let rc = load_config(config, profile);
            println!("{}", build_search(&rc, &args).get_filter());
        }
        FilterCommand::Import(args) => {
            let filter = FilterArgs { filter_file: Some(args.file), ..Default::default() };
            let session = Session::open(config, profile);
            let search = session.search(&filter);
            let items: Vec<MediaOutput> = search
                .items()
                .iter()
                .map(|resource| MediaOutput::new(resource, &session.index))
                .collect();
            let format = if args.json { OutputFormat::Json } else { OutputFormat::Table };
            print_media(&items, format);
        }
    }
}

