//! One-level directory comparison.
//!
//! [`DirComparer`] lists two directories side by side and classifies every
//! name: present on one side only, a subdirectory on both sides, a file with
//! the same or different contents, or something that can't be compared.
//!
//! Stat results and file comparison outcomes are cached across calls. Each
//! [`DirComparer::compare`] call first evicts the directories' own entries
//! from the stat cache so that added or removed files are noticed.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cache::{CacheError, FileKind, Signature};
use crate::clients::compare::FileComparator;
use crate::clients::stat::StatCache;

/// Classification of the entries of two directories.
///
/// All name lists are sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirComparison {
    /// Left directory
    pub left: PathBuf,
    /// Right directory
    pub right: PathBuf,
    /// Names only in `left`
    pub left_only: Vec<String>,
    /// Names only in `right`
    pub right_only: Vec<String>,
    /// Names that are directories on both sides
    pub common_dirs: Vec<String>,
    /// Regular files with identical contents
    pub same_files: Vec<String>,
    /// Regular files with different contents
    pub diff_files: Vec<String>,
    /// Names whose types differ, or that could not be stat'd or read
    pub funny: Vec<String>,
}

impl DirComparison {
    /// Whether the two directories have the same top-level content.
    ///
    /// Subdirectories are not descended into.
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.left_only.is_empty()
            && self.right_only.is_empty()
            && self.diff_files.is_empty()
            && self.funny.is_empty()
    }

    /// Render a plain-text report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "diff {} {}",
            self.left.display(),
            self.right.display()
        );
        let sections: [(&str, &[String]); 6] = [
            ("Only in left", &self.left_only),
            ("Only in right", &self.right_only),
            ("Identical files", &self.same_files),
            ("Differing files", &self.diff_files),
            ("Common subdirectories", &self.common_dirs),
            ("Not comparable", &self.funny),
        ];
        for (title, names) in sections {
            if !names.is_empty() {
                let _ = writeln!(out, "{}: {}", title, names.join(" "));
            }
        }
        out
    }
}

/// Directory comparator with its own stat and outcome caches.
#[derive(Debug, Default)]
pub struct DirComparer {
    stats: StatCache,
    files: FileComparator,
}

impl DirComparer {
    /// Create a comparer with fresh caches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a comparer from application settings.
    #[must_use]
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            stats: StatCache::new().with_unicode_normalization(config.normalize_unicode),
            files: FileComparator::from_config(config),
        }
    }

    /// Use a specific file comparator.
    #[must_use]
    pub fn with_file_comparator(mut self, files: FileComparator) -> Self {
        self.files = files;
        self
    }

    /// Compare the top level of `left` and `right`.
    ///
    /// # Errors
    ///
    /// [`CacheError::NotFound`] if either directory cannot be listed.
    /// Problems with individual entries land in [`DirComparison::funny`].
    pub fn compare(&mut self, left: &Path, right: &Path) -> Result<DirComparison, CacheError> {
        self.stats.forget_directory(left);
        self.stats.forget_directory(right);

        let left_names = list_names(left)?;
        let right_names = list_names(right)?;

        let mut result = DirComparison {
            left: left.to_path_buf(),
            right: right.to_path_buf(),
            ..DirComparison::default()
        };
        result.left_only = left_names.difference(&right_names).cloned().collect();
        result.right_only = right_names.difference(&left_names).cloned().collect();

        for name in left_names.intersection(&right_names) {
            let a = left.join(name);
            let b = right.join(name);
            let (sig_a, sig_b) = match (self.stats.stat(&a), self.stats.stat(&b)) {
                (Ok(sig_a), Ok(sig_b)) => (sig_a, sig_b),
                (Err(e), _) | (_, Err(e)) => {
                    log::debug!("dircmp: {}", e);
                    result.funny.push(name.clone());
                    continue;
                }
            };

            match (sig_a.kind, sig_b.kind) {
                (FileKind::Directory, FileKind::Directory) => {
                    result.common_dirs.push(name.clone());
                }
                (FileKind::Regular, FileKind::Regular) => {
                    match self.files.compare_signed(&a, sig_a, &b, sig_b) {
                        Ok(true) => result.same_files.push(name.clone()),
                        Ok(false) => result.diff_files.push(name.clone()),
                        Err(e) => {
                            log::warn!("dircmp: {}", e);
                            result.funny.push(name.clone());
                        }
                    }
                }
                _ => result.funny.push(name.clone()),
            }
        }

        log::debug!(
            "dircmp {} {}: {} same, {} differ, {} one-sided",
            left.display(),
            right.display(),
            result.same_files.len(),
            result.diff_files.len(),
            result.left_only.len() + result.right_only.len()
        );
        Ok(result)
    }

    /// The stat cache used for entries.
    #[must_use]
    pub fn stat_cache(&self) -> &StatCache {
        &self.stats
    }

    /// The file comparator used for regular files.
    #[must_use]
    pub fn file_comparator(&self) -> &FileComparator {
        &self.files
    }
}

/// Names of the direct entries of `dir`.
fn list_names(dir: &Path) -> Result<BTreeSet<String>, CacheError> {
    if !Signature::of(dir)?.is_dir() {
        return Err(CacheError::not_found(
            dir,
            std::io::Error::other("not a directory"),
        ));
    }

    let mut names = BTreeSet::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            CacheError::not_found(dir, source)
        })?;
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
