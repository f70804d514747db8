mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gallery_core::filter::SortKey;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gallery", version, about = "Browse, filter and tag the media of a markdown vault")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// Rebuild the media and metadata caches and print statistics
    Index(IndexArgs),

    /// List media matching a filter
    Search(SearchArgs),

    /// Lay out matching media into grid columns for a container width
    Layout(LayoutArgs),

    /// Export or import a serialized filter block
    #[command(subcommand)]
    Filter(FilterCommand),

    /// Manage named filter presets
    #[command(subcommand)]
    Preset(PresetCommand),

    /// Add or remove tags on media files
    #[command(subcommand)]
    Tag(TagCommand),

    /// Move a media file; its metadata note follows
    Rename(RenameArgs),

    /// Duplicate a media file
    Copy(CopyArgs),

    /// Delete media files; with several paths their metadata notes go too
    Delete(DeleteArgs),

    /// Show stats, metadata and backlinks of a media file
    Info(InfoArgs),

    /// Render the gallery blocks embedded in a note
    Block(BlockArgs),
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    /// One path per line
    Quiet,
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Print every metadata note as it is scanned
    #[arg(long, short)]
    pub verbose: bool,

    /// Stop the metadata scan after this many notes
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Filter options shared by every command that runs a search.
#[derive(Debug, Args, Default)]
pub struct FilterArgs {
    /// Advanced query, e.g. `path:art tag:"cat -dog"`
    pub query: Option<String>,

    /// Start from a saved preset
    #[arg(long)]
    pub preset: Option<String>,

    /// Start from a filter block file (`-` reads stdin)
    #[arg(long)]
    pub filter_file: Option<PathBuf>,

    #[arg(long)]
    pub path: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub regex: Option<String>,

    #[arg(long)]
    pub tag: Option<String>,

    /// Frontmatter field filter as FIELD=TEXT (repeatable)
    #[arg(long = "field", value_name = "FIELD=TEXT")]
    pub fields: Vec<String>,

    #[arg(long)]
    pub match_case: bool,

    /// Require every criterion in every group
    #[arg(long)]
    pub exclusive: bool,

    #[arg(long)]
    pub sort: Option<SortKey>,

    #[arg(long)]
    pub reverse: bool,

    /// Keep the sort direction forward even if a preset reverses it
    #[arg(long, conflicts_with = "reverse")]
    pub no_reverse: bool,

    /// Show a random sample of this many items
    #[arg(long)]
    pub random: Option<usize>,

    /// Seed for the random sample
    #[arg(long)]
    pub seed: Option<u64>,

    /// Comma-separated indices into the filtered list
    #[arg(long, value_delimiter = ',')]
    pub custom_list: Vec<usize>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(long, value_enum, default_value_t)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long)]
    pub json: bool,

    /// Shorthand for --output quiet
    #[arg(long, short)]
    pub quiet: bool,

    /// Show at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Container width in pixels
    #[arg(long)]
    pub width: f64,

    /// Maximum item width in pixels (defaults to gallery.item_width)
    #[arg(long)]
    pub item_width: Option<u32>,

    /// Maximum item height in pixels
    #[arg(long)]
    pub item_height: Option<u32>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum FilterCommand {
    /// Print the filter block for a search
    Export(FilterArgs),

    /// Read a filter block and list the media it matches
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Filter block file (`-` reads stdin)
    pub file: PathBuf,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum PresetCommand {
    /// Save the filter of a search under a name
    Save {
        #[arg(id = "preset_name", value_name = "NAME")]
        name: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List saved presets
    List {
        #[arg(long)]
        json: bool,
    },

    /// Print the filter block of a preset
    Show { name: String },

    /// Delete a preset
    Remove { name: String },
}

#[derive(Debug, Subcommand)]
pub enum TagCommand {
    /// Add tags to media files
    Add(TagArgs),

    /// Remove tags from media files
    Remove(TagArgs),
}

#[derive(Debug, Args)]
pub struct TagArgs {
    /// Media paths relative to the vault root
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Tags to add or remove (repeatable or comma-separated)
    #[arg(long = "tag", short, required = true, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Skip the confirmation prompt for large batches
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    pub from: String,

    /// New path; without an extension the old one is kept
    pub to: String,
}

#[derive(Debug, Args)]
pub struct CopyArgs {
    pub from: String,

    /// Target path (defaults to a free numbered name beside the source)
    pub to: Option<String>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Skip the confirmation prompt for large batches
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    pub path: String,

    /// Create the metadata note if it is missing
    #[arg(long)]
    pub create_note: bool,

    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct BlockArgs {
    /// Note containing ```gallery or ```gallery-info blocks
    pub note: PathBuf,

    /// Container width used to lay out grid blocks
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile),
        Commands::Index(args) => cmd::index::run(config, profile, args),
        Commands::Search(args) => cmd::search::run(config, profile, args),
        Commands::Layout(args) => cmd::layout::run(config, profile, args),
        Commands::Filter(command) => cmd::filter::run(config, profile, command),
        Commands::Preset(command) => cmd::preset::run(config, profile, command),
        Commands::Tag(command) => cmd::tag::run(config, profile, command),
        Commands::Rename(args) => cmd::file_ops::rename(config, profile, args),
        Commands::Copy(args) => cmd::file_ops::copy(config, profile, args),
        Commands::Delete(args) => cmd::file_ops::delete(config, profile, args),
        Commands::Info(args) => cmd::info::run(config, profile, args),
        Commands::Block(args) => cmd::block::run(config, profile, args),
    }

    logging::shutdown();
}
