//! Memoized stat lookups.
//!
//! [`StatCache`] remembers the signature of every path it has stat'd and
//! never re-checks it on its own. Callers that know something changed evict
//! it explicitly (a single path, a prefix, or a directory's direct entries).

use std::path::Path;

use crate::cache::{CacheError, Signature, Store};

/// Cache of stat results keyed by path.
#[derive(Debug, Default)]
pub struct StatCache {
    store: Store<Signature, ()>,
}

impl StatCache {
    /// Create an empty stat cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize cache keys to Unicode NFC.
    #[must_use]
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.store = std::mem::take(&mut self.store).with_unicode_normalization(enabled);
        self
    }

    /// Signature of `path`, from the cache if present.
    ///
    /// # Errors
    ///
    /// [`CacheError::NotFound`] if the path cannot be stat'd. Failures are
    /// not remembered, so the next call stats again.
    pub fn stat(&mut self, path: &Path) -> Result<Signature, CacheError> {
        let key = self.store.key_for(path);
        self.store
            .get_or_compute_stamped(&key, (), || Signature::of(path))
            .copied()
    }

    /// Whether `path` is a directory. `false` if it cannot be stat'd.
    pub fn is_dir(&mut self, path: &Path) -> bool {
        self.stat(path).is_ok_and(|sig| sig.is_dir())
    }

    /// Forget everything cached for `path`.
    pub fn forget(&mut self, path: &Path) -> bool {
        let key = self.store.key_for(path);
        self.store.forget(&key)
    }

    /// Forget `dir` and its direct entries.
    pub fn forget_directory(&mut self, dir: &Path) -> usize {
        let key = self.store.key_for(dir);
        self.store.forget_directory(&key)
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Store<Signature, ()> {
        &self.store
    }

    /// The underlying store, for bulk eviction.
    pub fn store_mut(&mut self) -> &mut Store<Signature, ()> {
        &mut self.store
    }
}
