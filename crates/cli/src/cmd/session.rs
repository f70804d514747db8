//! Config loading, index building and filter assembly shared by commands.

use std::fmt::Display;
use std::io::Read;
use std::path::Path;

use dialoguer::Confirm;
use gallery_core::config::{ConfigLoader, ResolvedConfig};
use gallery_core::filter::SearchState;
use gallery_core::index::{IndexStats, ProgressCallback, ResourceIndex};
use gallery_core::presets::PresetStore;
use gallery_core::search::MediaSearch;
use gallery_core::vault::Vault;

use crate::logging;
use crate::FilterArgs;

/// Print an error and exit with status 1.
pub fn fail(context: &str, e: impl Display) -> ! {
    eprintln!("{context}: {e}");
    std::process::exit(1);
}

/// Ask for confirmation; a non-interactive terminal declines.
pub fn confirm(prompt: &str) -> bool {
    Confirm::new().with_prompt(prompt).default(false).interact().unwrap_or(false)
}

/// Load the configuration and install logging.
pub fn load_config(config: Option<&Path>, profile: Option<&str>) -> ResolvedConfig {
    let rc = match ConfigLoader::load(config, profile) {
        Ok(rc) => rc,
        Err(e) => fail("Error loading config", e),
    };
    logging::init(&rc);
    rc
}

/// A vault with a freshly built index.
pub struct Session {
    pub config: ResolvedConfig,
    pub vault: Vault,
    pub index: ResourceIndex,
}

impl Session {
    pub fn open(config: Option<&Path>, profile: Option<&str>) -> Self {
        Self::build(load_config(config, profile), None).0
    }

    /// Build the index for an already loaded configuration.
    pub fn build(rc: ResolvedConfig, progress: Option<ProgressCallback>) -> (Self, IndexStats) {
        let vault = Vault::new(&rc.vault_root).with_exclusions(rc.excluded_folders.clone());
        let mut index = ResourceIndex::new(rc.meta_folder.clone());
        let stats = match index.rebuild(&vault, progress) {
            Ok(stats) => stats,
            Err(e) => fail("Error building index", e),
        };
        (Self { config: rc, vault, index }, stats)
    }

    /// Run a search and return it with results sorted.
    pub fn search(&self, args: &FilterArgs) -> MediaSearch {
        let mut search = build_search(&self.config, args);
        let mut rng = match args.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        if let Err(e) = search.update_data(&self.index, &mut rng) {
            fail("Error running search", e);
        }
        search
    }
}

pub fn open_presets(rc: &ResolvedConfig) -> PresetStore {
    match PresetStore::load(&rc.settings_path()) {
        Ok(store) => store,
        Err(e) => fail("Error loading presets", e),
    }
}

/// Read a file, or stdin for `-`.
pub fn read_input(path: &Path) -> String {
    let result = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(path)
    };
    match result {
        Ok(text) => text,
        Err(e) => fail(&format!("Error reading {}", path.display()), e),
    }
}

/// Assemble the search described by the filter flags.
///
/// Layers apply in order: config defaults, preset, filter file, query, then
/// the individual flags.
pub fn build_search(rc: &ResolvedConfig, args: &FilterArgs) -> MediaSearch {
    let mut search = MediaSearch::new(SearchState {
        sort: rc.gallery.default_sort,
        max_width: rc.gallery.item_width,
        max_height: rc.gallery.item_height,
        ..Default::default()
    });

    if let Some(name) = &args.preset {
        let store = open_presets(rc);
        match store.get(name) {
            Some(preset) => search.set_filter(&preset.filter),
            None => fail("Error loading preset", format!("no preset named '{name}'")),
        }
    }
    if let Some(file) = &args.filter_file {
        search.set_filter(&read_input(file));
    }
    if let Some(query) = &args.query {
        search.apply_query(query);
    }

    if let Some(path) = &args.path {
        search.set_path(path);
    }
    if let Some(name) = &args.name {
        search.set_name(name);
    }
    if let Some(regex) = &args.regex {
        search.set_regex(regex);
    }
    if let Some(tag) = &args.tag {
        search.set_tag(tag);
    }
    for field in &args.fields {
        match field.split_once('=') {
            Some((key, text)) => search.set_field(key.trim(), text.trim()),
            None => fail("Invalid --field", format!("expected FIELD=TEXT, got '{field}'")),
        }
    }
    if args.match_case {
        search.set_match_case(true);
    }
    if args.exclusive {
        search.set_exclusive(true);
    }
    if let Some(count) = args.random {
        search.set_random(count);
    }
    if !args.custom_list.is_empty() {
        search.set_custom_list(args.custom_list.clone());
    }

    let sort = args.sort.unwrap_or(search.state().sort);
    let reverse = match (args.reverse, args.no_reverse) {
        (true, _) => true,
        (_, true) => false,
        _ => search.state().reverse,
    };
    search.update_sort(sort, reverse);
    search
}
