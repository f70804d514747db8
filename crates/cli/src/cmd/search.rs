//! Search command implementation.

use std::path::Path;

use super::output::{print_media, resolve_format, MediaOutput};
use super::session::Session;
use crate::SearchArgs;

pub fn run(config: Option<&Path>, profile: Option<&str>, args: SearchArgs) {
    let session = Session::open(config, profile);
    let search = session.search(&args.filter);

    let items: Vec<MediaOutput> = search
        .items()
        .iter()
        .take(args.limit.unwrap_or(usize::MAX))
        .map(|resource| MediaOutput::new(resource, &session.index))
        .collect();

    tracing::debug!(
        "search matched {} of {} media (sort {}, reverse {})",
        search.len(),
        session.index.len(),
        search.state().sort,
        search.state().reverse
    );
    print_media(&items, resolve_format(args.output, args.json, args.quiet));
}
