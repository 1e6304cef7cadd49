//! File signature computation.
//!
//! A [`Signature`] is the cheap fingerprint used to detect that a file changed
//! without reading its contents: file kind, size in bytes, and modification
//! time. Signatures live only in memory and are never persisted.

use serde::Serialize;
use std::fs::Metadata;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::CacheError;

/// Coarse file type classification.
///
/// Symlinks are followed when stat'ing, so a link to a regular file is
/// [`FileKind::Regular`]. Devices, sockets, FIFOs and anything else that is
/// neither a regular file nor a directory collapse into [`FileKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// A regular file
    Regular,
    /// A directory
    Directory,
    /// Anything else
    Other,
}

impl FileKind {
    fn from_metadata(metadata: &Metadata) -> Self {
        let file_type = metadata.file_type();
        if file_type.is_file() {
            Self::Regular
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }
}

/// Fingerprint of a file's state at stat time.
///
/// Two signatures are equal only if kind, size, and mtime all match exactly.
/// There is no tolerance window on mtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Coarse file type
    pub kind: FileKind,
    /// Size in bytes as reported by the filesystem
    pub size: u64,
    /// Last modification time
    pub mtime: SystemTime,
}

impl Signature {
    /// Stat `path` and build its signature.
    ///
    /// Symlinks are followed.
    ///
    /// # Errors
    ///
    /// Any stat failure (missing file, permission denied, broken link) is
    /// reported as [`CacheError::NotFound`], with the original I/O error kept
    /// as its source.
    pub fn of(path: &Path) -> Result<Self, CacheError> {
        let metadata =
            std::fs::metadata(path).map_err(|source| CacheError::not_found(path, source))?;
        Ok(Self::from_metadata(&metadata))
    }

    /// Build a signature from already-fetched metadata.
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            kind: FileKind::from_metadata(metadata),
            size: metadata.len(),
            // Platforms without mtime support still get a comparable value
            mtime: metadata.modified().unwrap_or(UNIX_EPOCH),
        }
    }

    /// Whether the signature describes a regular file.
    #[must_use]
    pub fn is_regular(&self) -> bool {
        self.kind == FileKind::Regular
    }

    /// Whether the signature describes a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}
