//! Line-oriented file reader backed by a stat-validated cache.
//!
//! [`LineCache`] reads whole files once and serves their lines from memory
//! until the file's signature changes.
//!
//! # Missing files
//!
//! By default a missing or unreadable file is an error. Callers that prefer
//! an empty result (for example when decorating tracebacks, where a missing
//! source file is routine) opt into [`OnMissing::EmptyDefault`]; the failure
//! is then logged as a warning instead of returned.
//!
//! # Example
//!
//! ```no_run
//! use statcache::clients::lines::{LineCache, OnMissing};
//! use std::path::Path;
//!
//! let mut lines = LineCache::new().with_on_missing(OnMissing::EmptyDefault);
//! if let Some(line) = lines.get_line(Path::new("src/main.rs"), 1)? {
//!     print!("{}", line);
//! }
//! # Ok::<(), statcache::cache::CacheError>(())
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cache::{CacheError, Signature, Store};

/// What [`LineCache`] does when a file cannot be stat'd or read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OnMissing {
    /// Return the error to the caller
    #[default]
    Propagate,
    /// Log a warning and return no lines
    #[value(name = "empty")]
    #[serde(alias = "empty")]
    EmptyDefault,
}

/// Cache of file contents split into lines.
#[derive(Debug, Default)]
pub struct LineCache {
    store: Store<Vec<String>>,
    on_missing: OnMissing,
    search_dirs: Vec<PathBuf>,
}

impl LineCache {
    /// Create a line cache that propagates errors and has no search dirs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a line cache from application settings.
    #[must_use]
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new()
            .with_on_missing(config.on_missing)
            .with_search_dirs(config.search_dirs.clone())
            .with_unicode_normalization(config.normalize_unicode)
    }

    /// Set the missing-file policy.
    #[must_use]
    pub fn with_on_missing(mut self, policy: OnMissing) -> Self {
        self.on_missing = policy;
        self
    }

    /// Directories tried, in order, for relative names not found as given.
    #[must_use]
    pub fn with_search_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.search_dirs = dirs;
        self
    }

    /// Normalize cache keys to Unicode NFC.
    #[must_use]
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.store = std::mem::take(&mut self.store).with_unicode_normalization(enabled);
        self
    }

    /// The active missing-file policy.
    #[must_use]
    pub fn on_missing(&self) -> OnMissing {
        self.on_missing
    }

    /// All lines of `path`, terminators included.
    ///
    /// # Errors
    ///
    /// With [`OnMissing::Propagate`], returns [`CacheError::NotFound`] when
    /// the file cannot be located and [`CacheError::ReadFailure`] when it
    /// cannot be read. Neither outcome is cached.
    pub fn get_lines(&mut self, path: &Path) -> Result<&[String], CacheError> {
        let on_missing = self.on_missing;
        let fetched = match self.resolve(path) {
            Ok((resolved, signature)) => self
                .store
                .get_or_compute_signed(&resolved, signature, || read_lines(&resolved))
                .map(Vec::as_slice),
            Err(e) => {
                self.forget_candidates(path);
                Err(e)
            }
        };

        match (fetched, on_missing) {
            (Ok(lines), _) => Ok(lines),
            (Err(e), OnMissing::Propagate) => Err(e),
            (Err(e), OnMissing::EmptyDefault) => {
                log::warn!("{}", e);
                Ok(&[])
            }
        }
    }

    /// One line of `path`, 1-based.
    ///
    /// Returns `None` for line 0 or past the end of the file.
    ///
    /// # Errors
    ///
    /// Same as [`get_lines`](Self::get_lines).
    pub fn get_line(&mut self, path: &Path, lineno: usize) -> Result<Option<&str>, CacheError> {
        let lines = self.get_lines(path)?;
        Ok(lineno
            .checked_sub(1)
            .and_then(|idx| lines.get(idx))
            .map(String::as_str))
    }

    /// Discard any cached copy of `path` and read it again.
    ///
    /// # Errors
    ///
    /// Same as [`get_lines`](Self::get_lines).
    pub fn update(&mut self, path: &Path) -> Result<&[String], CacheError> {
        if let Ok((resolved, _)) = self.resolve(path) {
            self.store.forget(&self.store.key_for(&resolved));
        }
        self.get_lines(path)
    }

    /// Drop stale entries: the one for `path`, or all of them.
    ///
    /// Returns the number of entries evicted.
    pub fn check(&mut self, path: Option<&Path>) -> usize {
        match path {
            Some(path) => match self.resolve(path) {
                Ok((resolved, _)) => {
                    let key = self.store.key_for(&resolved);
                    if !self.store.contains_key(&key) {
                        return 0;
                    }
                    usize::from(self.store.check(&key) != crate::cache::Freshness::Fresh)
                }
                Err(_) => self.forget_candidates(path),
            },
            None => self.store.check_all(),
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.store.clear_all();
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Store<Vec<String>> {
        &self.store
    }

    /// The underlying store, for bulk eviction.
    pub fn store_mut(&mut self) -> &mut Store<Vec<String>> {
        &mut self.store
    }

    /// Forget every key `path` could have been stored under: as given, and
    /// joined to each search dir when relative.
    fn forget_candidates(&mut self, path: &Path) -> usize {
        let mut keys = vec![self.store.key_for(path)];
        if path.is_relative() {
            keys.extend(
                self.search_dirs
                    .iter()
                    .map(|dir| self.store.key_for(&dir.join(path))),
            );
        }
        keys.iter().filter(|key| self.store.forget(key)).count()
    }

    /// Locate `path`, falling back to the search dirs for relative names.
    fn resolve(&self, path: &Path) -> Result<(PathBuf, Signature), CacheError> {
        let err = match Signature::of(path) {
            Ok(signature) => return Ok((path.to_path_buf(), signature)),
            Err(e) => e,
        };
        if path.is_absolute() {
            return Err(err);
        }

        for dir in &self.search_dirs {
            let candidate = dir.join(path);
            if let Ok(signature) = Signature::of(&candidate) {
                log::trace!(
                    "Resolved {} via search dir {}",
                    path.display(),
                    dir.display()
                );
                return Ok((candidate, signature));
            }
        }
        Err(err)
    }
}

/// Read `path` and split it into lines, keeping terminators.
///
/// Invalid UTF-8 is replaced lossily.
fn read_lines(path: &Path) -> Result<Vec<String>, CacheError> {
    let bytes = std::fs::read(path).map_err(|source| CacheError::read_failure(path, source))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.split_inclusive('\n').map(str::to_owned).collect())
}
