//! Command-line interface definitions for statcache.
//!
//! The binary is a thin inspection tool over the library's client wrappers.
//!
//! # Example
//!
//! ```bash
//! # Print lines 3 and 10 of a file
//! statcache lines src/main.rs -n 3 -n 10
//!
//! # Compare two files by content (exit 0 same, 2 different)
//! statcache cmp a.bin b.bin
//!
//! # Compare two directories one level deep, as JSON
//! statcache dircmp left/ right/ --output json
//!
//! # Show signatures
//! statcache -v stat Cargo.toml src
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::clients::lines::OnMissing;

/// Stat-validated file caches: line reader, file and directory comparison.
#[derive(Debug, Parser)]
#[command(name = "statcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (TOML) instead of the platform default
    #[arg(long, value_name = "FILE", global = true, env = "STATCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a file's lines, or selected lines
    Lines(LinesArgs),
    /// Compare two files by content
    Cmp(CmpArgs),
    /// Compare two directories one level deep
    Dircmp(DircmpArgs),
    /// Show file signatures (kind, size, mtime)
    Stat(StatArgs),
}

/// Arguments for the lines subcommand.
#[derive(Debug, Args)]
pub struct LinesArgs {
    /// File to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Line number to print (1-based, repeatable); all lines if omitted
    #[arg(short = 'n', long = "line", value_name = "N")]
    pub lines: Vec<usize>,

    /// What to do if the file is missing (overrides config)
    #[arg(long, value_enum)]
    pub on_missing: Option<OnMissing>,

    /// Extra directory to search for relative names (repeatable)
    #[arg(long = "search-dir", value_name = "DIR")]
    pub search_dirs: Vec<PathBuf>,
}

/// Arguments for the cmp subcommand.
#[derive(Debug, Args)]
pub struct CmpArgs {
    /// First file
    #[arg(value_name = "A")]
    pub left: PathBuf,

    /// Second file
    #[arg(value_name = "B")]
    pub right: PathBuf,

    /// Trust identical signatures without reading contents
    #[arg(long)]
    pub shallow: bool,
}

/// Arguments for the dircmp subcommand.
#[derive(Debug, Args)]
pub struct DircmpArgs {
    /// Left directory
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// Right directory
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Trust identical signatures without reading contents
    #[arg(long)]
    pub shallow: bool,
}

/// Arguments for the stat subcommand.
#[derive(Debug, Args)]
pub struct StatArgs {
    /// Paths to stat
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output format for reporting commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON for scripting
    Json,
}
