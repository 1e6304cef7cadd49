//! Cache key derivation from paths.
//!
//! Cache keys are plain strings so that prefix and directory eviction can work
//! on them byte-wise. This module turns paths into those strings.
//!
//! # Separators
//!
//! Keys always use `/` as separator. On Windows, backslashes are rewritten so
//! that `forget_directory("C:/tmp")` also matches entries created from
//! `C:\tmp\file.txt`.
//!
//! # Unicode
//!
//! macOS uses NFD (Decomposed) normalization for file paths, while Windows
//! and Linux typically use NFC (Composed) normalization. The same visual
//! filename can therefore have different byte representations:
//!
//! - NFC: `café.txt` - 'é' is U+00E9 (single code point)
//! - NFD: `café.txt` - 'e' U+0065 + combining acute accent U+0301
//!
//! When normalization is enabled, keys are converted to NFC so both spellings
//! share one cache entry.
//!
//! # Example
//!
//! ```
//! use statcache::cache::path_utils::path_key;
//! use std::path::Path;
//!
//! let nfc = path_key(Path::new("café.txt"), true);
//! let nfd = path_key(Path::new("cafe\u{0301}.txt"), true);
//! assert_eq!(nfc, nfd);
//! ```

use std::borrow::Cow;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Separator used inside cache keys.
pub const KEY_SEPARATOR: char = '/';

/// Joins the two halves of a composite key.
///
/// NUL cannot occur in a path, so composite keys never collide with each
/// other or with plain path keys.
pub const COMPOSITE_SEPARATOR: char = '\0';

/// Normalize a key string to NFC, borrowing when it is already NFC.
///
/// # Example
///
/// ```
/// use statcache::cache::path_utils::normalize_key_str;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_key_str("plain.txt"), Cow::Borrowed(_)));
/// assert_eq!(normalize_key_str("cafe\u{0301}.txt"), "café.txt");
/// ```
#[must_use]
pub fn normalize_key_str(s: &str) -> Cow<'_, str> {
    if unicode_normalization::is_nfc(s) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.nfc().collect())
    }
}

/// Convert a path to its raw key string.
///
/// Invalid UTF-8 is replaced lossily. On Windows, `\` becomes `/`.
#[must_use]
pub fn raw_key(path: &Path) -> String {
    let lossy = path.to_string_lossy();
    #[cfg(windows)]
    {
        lossy.replace('\\', "/")
    }
    #[cfg(not(windows))]
    {
        lossy.into_owned()
    }
}

/// Create the cache key for a path.
///
/// # Arguments
///
/// * `path` - The path to create a key for
/// * `normalize_unicode` - Whether to convert the key to NFC
#[must_use]
pub fn path_key(path: &Path, normalize_unicode: bool) -> String {
    let key = raw_key(path);
    if normalize_unicode {
        normalize_key_str(&key).into_owned()
    } else {
        key
    }
}

/// Build a composite key from two already-derived keys.
///
/// Order matters: `composite_key(a, b)` and `composite_key(b, a)` differ.
#[must_use]
pub fn composite_key(first: &str, second: &str) -> String {
    let mut key = String::with_capacity(first.len() + second.len() + 1);
    key.push_str(first);
    key.push(COMPOSITE_SEPARATOR);
    key.push_str(second);
    key
}
