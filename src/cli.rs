//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Content indexer and reader for a markdown-backed portfolio blog
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Content directory path (relative to project root)
    #[arg(short, long)]
    pub content: Option<PathBuf>,

    /// Config file name (default: folio.toml)
    #[arg(short = 'C', long, default_value = "folio.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared arguments for the query commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ReaderArgs {
    /// Base URL or directory to read artifacts from (default: output directory)
    #[arg(short, long)]
    pub from: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a config file and an empty content directory
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Scan the content directory and write the index and tag artifacts
    Index {
        /// enable rss feed generation
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        rss: Option<bool>,
    },

    /// Index, then serve the output directory. Re-index on change automatically
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,

        /// enable watch
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },

    /// Print all content items as JSON, newest first
    List {
        #[command(flatten)]
        reader: ReaderArgs,

        /// Only items carrying this exact tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only items whose title or tags contain this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print one content item as JSON
    Get {
        /// Item id (file name without extension)
        id: String,

        #[command(flatten)]
        reader: ReaderArgs,
    },

    /// Print the tag list as JSON
    Tags {
        #[command(flatten)]
        reader: ReaderArgs,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    /// Reader arguments of the query commands, if this is one.
    pub fn reader_args(&self) -> Option<&ReaderArgs> {
        match &self.command {
            Commands::List { reader, .. }
            | Commands::Get { reader, .. }
            | Commands::Tags { reader } => Some(reader),
            _ => None,
        }
    }
}
