//! statcache - Stat-validated file caches
//!
//! An in-process memoization layer keyed by file path. Each cached value is
//! stamped with the file's signature (kind, size, mtime) and recomputed
//! transparently when the file changes on disk. On top of the generic store
//! sit a line reader, a two-file content comparator, a stat cache and a
//! one-level directory comparer.
//!
//! # Example
//!
//! ```no_run
//! use statcache::clients::LineCache;
//! use std::path::Path;
//!
//! let mut lines = LineCache::new();
//! if let Some(line) = lines.get_line(Path::new("src/main.rs"), 1)? {
//!     print!("{line}");
//! }
//! # Ok::<(), statcache::cache::CacheError>(())
//! ```

pub mod cache;
pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod logging;

use anyhow::Result;
use bytesize::ByteSize;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::Path;

use crate::cache::{FileKind, Signature};
use crate::cli::{Cli, CmpArgs, Commands, DircmpArgs, LinesArgs, OutputFormat, StatArgs};
use crate::clients::{DirComparer, FileComparator, LineCache, StatCache};
use crate::config::Config;
use crate::error::ExitCode;

/// Run the command described by `cli`.
///
/// Returns the exit code on completion. Errors are left to the caller to
/// report; [`ExitCode::for_error`] picks their exit code.
///
/// # Errors
///
/// Propagates cache errors (missing or unreadable files) and output failures.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let mut config = Config::load(cli.config.as_deref());
    log::debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Lines(args) => run_lines(args, &mut config),
        Commands::Cmp(args) => run_cmp(args, &mut config),
        Commands::Dircmp(args) => run_dircmp(args, &mut config),
        Commands::Stat(args) => run_stat(args, &config),
    }
}

fn run_lines(args: LinesArgs, config: &mut Config) -> Result<ExitCode> {
    if let Some(policy) = args.on_missing {
        config.on_missing = policy;
    }
    config.search_dirs.extend(args.search_dirs);

    let mut cache = LineCache::from_config(config);
    if args.lines.is_empty() {
        for line in cache.get_lines(&args.file)? {
            print!("{}", line);
        }
        return Ok(ExitCode::Success);
    }

    for n in args.lines {
        match cache.get_line(&args.file, n)? {
            Some(line) => println!("{}", line.trim_end_matches(['\n', '\r'])),
            None => log::warn!("{}: no line {}", args.file.display(), n),
        }
    }
    Ok(ExitCode::Success)
}

fn run_cmp(args: CmpArgs, config: &mut Config) -> Result<ExitCode> {
    config.shallow_compare |= args.shallow;

    let mut comparator = FileComparator::from_config(config);
    if comparator.compare(&args.left, &args.right)? {
        println!(
            "{} and {} are identical",
            args.left.display(),
            args.right.display()
        );
        Ok(ExitCode::Success)
    } else {
        println!("{} and {} differ", args.left.display(), args.right.display());
        Ok(ExitCode::Different)
    }
}

fn run_dircmp(args: DircmpArgs, config: &mut Config) -> Result<ExitCode> {
    config.shallow_compare |= args.shallow;

    let mut comparer = DirComparer::from_config(config);
    let comparison = comparer.compare(&args.left, &args.right)?;

    match args.output {
        OutputFormat::Text => print!("{}", comparison.report()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
    }

    let stats = comparer.file_comparator().store().stats();
    log::debug!(
        "File comparison cache: {} hits, {} misses",
        stats.hits,
        stats.misses
    );

    Ok(if comparison.is_identical() {
        ExitCode::Success
    } else {
        ExitCode::Different
    })
}

/// One row of `stat` output.
#[derive(Debug, Serialize)]
struct StatRecord {
    path: String,
    kind: FileKind,
    size: u64,
    modified: DateTime<Local>,
}

impl StatRecord {
    fn new(path: &Path, signature: Signature) -> Self {
        Self {
            path: path.display().to_string(),
            kind: signature.kind,
            size: signature.size,
            modified: DateTime::<Local>::from(signature.mtime),
        }
    }
}

fn run_stat(args: StatArgs, config: &Config) -> Result<ExitCode> {
    let mut stats = StatCache::new().with_unicode_normalization(config.normalize_unicode);

    let records = args
        .paths
        .iter()
        .map(|path| Ok(StatRecord::new(path, stats.stat(path)?)))
        .collect::<Result<Vec<_>>>()?;

    match args.output {
        OutputFormat::Text => {
            for record in &records {
                println!(
                    "{:<9} {:>10}  {}  {}",
                    format!("{:?}", record.kind).to_lowercase(),
                    ByteSize::b(record.size).to_string(),
                    record.modified.format("%Y-%m-%d %H:%M:%S"),
                    record.path
                );
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
    }
    Ok(ExitCode::Success)
}
