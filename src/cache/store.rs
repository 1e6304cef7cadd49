//! The cache store.
//!
//! [`Store`] maps string keys to an [`Entry`] pairing a validity stamp with a
//! memoized value. For path-keyed stores the stamp is the file's
//! [`Signature`]; other clients use whatever token decides validity for them
//! (a pair of signatures, or `()` for entries that never expire on their own).

use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::path_utils::{normalize_key_str, path_key};
use super::signature::Signature;
use super::CacheError;

/// A memoized value and the stamp it was computed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V, S = Signature> {
    /// Validity stamp captured right before the value was computed
    pub stamp: S,
    /// The memoized value
    pub value: V,
    /// File the stamp was taken from, if it is not the key itself
    ///
    /// Set when the key was derived from a path (normalized or resolved),
    /// so revalidation can stat the real file.
    pub source: Option<PathBuf>,
}

/// Hit/miss counters for a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from a fresh entry
    pub hits: u64,
    /// Lookups that found no entry at all
    pub misses: u64,
    /// Lookups that found a stale entry and discarded it
    pub invalidations: u64,
    /// Entries removed by explicit eviction or revalidation
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, in `0.0..=1.0`.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses + self.invalidations;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// Owned key-to-value cache with stamp validation.
///
/// `Store` holds no global state: create one per context that needs it.
/// It is not internally synchronized; wrap it in a lock to share across
/// threads.
///
/// # Example
///
/// ```
/// use statcache::cache::Store;
///
/// let mut store: Store<String, u32> = Store::new();
/// let mut calls = 0;
///
/// let v = store
///     .get_or_compute_stamped("k", 1, || {
///         calls += 1;
///         Ok::<_, std::io::Error>("one".to_string())
///     })
///     .unwrap()
///     .clone();
/// assert_eq!(v, "one");
///
/// // Same stamp: served from the cache
/// store
///     .get_or_compute_stamped("k", 1, || {
///         calls += 1;
///         Ok::<_, std::io::Error>("again".to_string())
///     })
///     .unwrap();
/// assert_eq!(calls, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Store<V, S = Signature> {
    pub(crate) entries: HashMap<String, Entry<V, S>>,
    pub(crate) stats: CacheStats,
    normalize_unicode: bool,
}

impl<V, S> Default for Store<V, S> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
            normalize_unicode: false,
        }
    }
}

impl<V, S> Store<V, S> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Normalize keys (and eviction prefixes) to Unicode NFC.
    #[must_use]
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.normalize_unicode = enabled;
        self
    }

    /// Whether keys are NFC-normalized.
    #[must_use]
    pub fn normalizes_unicode(&self) -> bool {
        self.normalize_unicode
    }

    /// Derive the key this store uses for `path`.
    #[must_use]
    pub fn key_for(&self, path: &Path) -> String {
        path_key(path, self.normalize_unicode)
    }

    /// Apply the store's key normalization to an arbitrary string.
    pub(crate) fn normalize<'a>(&self, key: &'a str) -> Cow<'a, str> {
        if self.normalize_unicode {
            normalize_key_str(key)
        } else {
            Cow::Borrowed(key)
        }
    }

    /// Raw lookup, without any validation.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry<V, S>> {
        self.entries.get(&*self.normalize(key))
    }

    /// Raw insert, without any validation.
    ///
    /// Returns the entry previously stored under `key`, if any.
    pub fn insert(&mut self, key: impl Into<String>, stamp: S, value: V) -> Option<Entry<V, S>> {
        let key = key.into();
        let key = if self.normalize_unicode {
            normalize_key_str(&key).into_owned()
        } else {
            key
        };
        self.entries.insert(
            key,
            Entry {
                stamp,
                value,
                source: None,
            },
        )
    }

    /// Raw delete.
    ///
    /// Returns the removed entry, or `None` if the key was absent.
    pub fn remove(&mut self, key: &str) -> Option<Entry<V, S>> {
        let key = self.normalize(key).into_owned();
        self.entries.remove(&key)
    }

    /// Whether `key` has an entry, fresh or not.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&*self.normalize(key))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Current hit/miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Zero the hit/miss counters.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }
}

impl<V, S: PartialEq> Store<V, S> {
    /// Look up a value, returning it only if its stamp matches `stamp`.
    ///
    /// A stale entry is removed. This never computes anything.
    pub fn lookup(&mut self, key: &str, stamp: &S) -> Option<&V> {
        let key = self.normalize(key).into_owned();
        if !self.probe(&key, stamp) {
            return None;
        }
        self.entries.get(&key).map(|entry| &entry.value)
    }

    /// Return the value for `key` if fresh under `stamp`, else compute it.
    ///
    /// A stale entry is discarded before `compute` runs. If `compute` fails,
    /// nothing is stored and the error is returned unchanged.
    ///
    /// # Errors
    ///
    /// Whatever `compute` returns.
    pub fn get_or_compute_stamped<F, E>(&mut self, key: &str, stamp: S, compute: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let key = self.normalize(key).into_owned();
        self.fill(key, stamp, None, compute)
    }

    fn fill<F, E>(
        &mut self,
        key: String,
        stamp: S,
        source: Option<PathBuf>,
        compute: F,
    ) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if self.probe(&key, &stamp) {
            return Ok(&self.entries[&key].value);
        }

        let value = compute()?;
        let slot = self.entries.entry(key).insert_entry(Entry {
            stamp,
            value,
            source,
        });
        Ok(&slot.into_mut().value)
    }

    /// Check `key` against `stamp`, updating counters and dropping a stale
    /// entry. Returns `true` on a fresh hit.
    fn probe(&mut self, key: &str, stamp: &S) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.stamp == *stamp => {
                self.stats.hits += 1;
                log::trace!("Cache hit: {}", key);
                true
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.invalidations += 1;
                log::debug!("Cache entry stale, discarded: {}", key);
                false
            }
            None => {
                self.stats.misses += 1;
                log::trace!("Cache miss: {}", key);
                false
            }
        }
    }
}

impl<V> Store<V, Signature> {
    /// Return the value memoized for `path`, recomputing it if the file's
    /// signature changed since it was stored.
    ///
    /// `compute` receives `path` and runs only on a miss or a stale entry.
    ///
    /// # Errors
    ///
    /// If `path` cannot be stat'd, any entry for it is evicted and
    /// [`CacheError::NotFound`] is returned (converted into `E`). Errors from
    /// `compute` propagate and leave no entry behind.
    pub fn get_or_compute<F, E>(&mut self, path: &Path, compute: F) -> Result<&V, E>
    where
        F: FnOnce(&Path) -> Result<V, E>,
        E: From<CacheError>,
    {
        let key = self.key_for(path);
        let live = match Signature::of(path) {
            Ok(sig) => sig,
            Err(e) => {
                if self.entries.remove(&key).is_some() {
                    self.stats.evictions += 1;
                    log::debug!("Evicted entry for unreachable path: {}", key);
                }
                return Err(e.into());
            }
        };
        self.fill(key, live, Some(path.to_path_buf()), || compute(path))
    }

    /// Like [`get_or_compute`](Self::get_or_compute) with a signature the
    /// caller already took for `path`.
    ///
    /// The entry remembers `path`, so [`check`](Self::check) stats the file
    /// even when its key differs from the path (Unicode normalization).
    ///
    /// # Errors
    ///
    /// Whatever `compute` returns.
    pub fn get_or_compute_signed<F, E>(
        &mut self,
        path: &Path,
        signature: Signature,
        compute: F,
    ) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let key = self.key_for(path);
        self.fill(key, signature, Some(path.to_path_buf()), compute)
    }
}
