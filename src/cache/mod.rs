//! Stat-validated memoization cache.
//!
//! This module provides an in-memory store that maps a key (usually a file
//! path) to an expensive computed value, and throws the value away as soon as
//! the file it was derived from changes.
//!
//! # Architecture
//!
//! The caching system is split into several components:
//!
//! * [`signature`]: Cheap `(kind, size, mtime)` fingerprint from one stat call.
//! * [`path_utils`]: Key derivation from paths (separator and Unicode normalization).
//! * [`store`]: The [`Store`] itself, with raw access and `get_or_compute`.
//! * [`policy`]: Freshness decisions and bulk revalidation.
//! * [`evict`]: Coarse-grained removal by key, prefix, or directory.
//!
//! # Cache Invalidation
//!
//! Entries are validated using a combination of:
//! * Key (usually the file path)
//! * File kind (regular file, directory, other)
//! * File size
//! * Modification time (mtime), compared exactly
//!
//! If any of these attributes change, the entry is considered stale and the
//! value is recomputed on the next lookup. There is no time-based expiry.
//!
//! # Example
//!
//! ```no_run
//! use statcache::cache::{CacheError, Store};
//! use std::path::Path;
//!
//! let mut store: Store<usize> = Store::new();
//! let len = store.get_or_compute(Path::new("Cargo.toml"), |path| {
//!     std::fs::read(path)
//!         .map(|bytes| bytes.len())
//!         .map_err(|source| CacheError::ReadFailure {
//!             path: path.to_path_buf(),
//!             source,
//!         })
//! })?;
//! println!("{} bytes", len);
//! # Ok::<(), CacheError>(())
//! ```

pub mod evict;
pub mod path_utils;
pub mod policy;
pub mod signature;
pub mod store;

use std::path::{Path, PathBuf};

pub use policy::{assess, comparable, Freshness};
pub use signature::{FileKind, Signature};
pub use store::{CacheStats, Entry, Store};

/// Errors that can occur while validating or filling a cache entry.
///
/// Staleness is not an error: a stale entry is silently recomputed.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// The path does not exist or could not be stat'd.
    #[error("Path not found: {}", .path.display())]
    NotFound {
        /// Path that failed to resolve
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The path existed but its contents could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFailure {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// The path this error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path, .. } | Self::ReadFailure { path, .. } => path,
        }
    }

    /// Whether this is a [`CacheError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn not_found(path: &Path, source: std::io::Error) -> Self {
        Self::NotFound {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn read_failure(path: &Path, source: std::io::Error) -> Self {
        Self::ReadFailure {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
