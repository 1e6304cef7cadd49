//! Two-file content comparison with memoized outcomes.
//!
//! [`FileComparator`] answers "do these two files have the same contents?"
//! and remembers the answer until either file's signature changes.
//!
//! # Decision order
//!
//! 1. Both paths are stat'd; a failure is returned as [`CacheError::NotFound`].
//! 2. If either is not a regular file, the files are different.
//! 3. In shallow mode, identical signatures mean equal.
//! 4. Different sizes mean different, without reading anything.
//! 5. Otherwise the cached outcome is used if both signatures still match,
//!    else the files are compared byte by byte and the outcome stored.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::cache::path_utils::composite_key;
use crate::cache::{comparable, CacheError, Signature, Store};

/// Default chunk size for content comparison.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Cached pairwise file comparator.
#[derive(Debug)]
pub struct FileComparator {
    store: Store<bool, (Signature, Signature)>,
    shallow: bool,
    buffer_size: usize,
}

impl Default for FileComparator {
    fn default() -> Self {
        Self {
            store: Store::new(),
            shallow: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl FileComparator {
    /// Create a comparator that always checks contents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a comparator from application settings.
    #[must_use]
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new()
            .with_shallow(config.shallow_compare)
            .with_buffer_size(config.compare_buffer_size)
            .with_unicode_normalization(config.normalize_unicode)
    }

    /// Trust identical signatures without reading contents.
    #[must_use]
    pub fn with_shallow(mut self, shallow: bool) -> Self {
        self.shallow = shallow;
        self
    }

    /// Chunk size for content comparison. Zero falls back to the default.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = if size == 0 { DEFAULT_BUFFER_SIZE } else { size };
        self
    }

    /// Normalize cache keys to Unicode NFC.
    #[must_use]
    pub fn with_unicode_normalization(mut self, enabled: bool) -> Self {
        self.store = std::mem::take(&mut self.store).with_unicode_normalization(enabled);
        self
    }

    /// Whether `a` and `b` have identical contents.
    ///
    /// # Errors
    ///
    /// [`CacheError::NotFound`] if either path cannot be stat'd,
    /// [`CacheError::ReadFailure`] if reading fails during comparison.
    /// Failed comparisons are not cached.
    pub fn compare(&mut self, a: &Path, b: &Path) -> Result<bool, CacheError> {
        let sig_a = Signature::of(a)?;
        let sig_b = Signature::of(b)?;
        self.compare_signed(a, sig_a, b, sig_b)
    }

    /// Like [`compare`](Self::compare) with signatures the caller already has.
    pub(crate) fn compare_signed(
        &mut self,
        a: &Path,
        sig_a: Signature,
        b: &Path,
        sig_b: Signature,
    ) -> Result<bool, CacheError> {
        if !comparable(&sig_a, &sig_b) {
            log::trace!(
                "Not both regular files, reporting different: {} {}",
                a.display(),
                b.display()
            );
            return Ok(false);
        }
        if self.shallow && sig_a == sig_b {
            return Ok(true);
        }
        if sig_a.size != sig_b.size {
            return Ok(false);
        }

        let key = composite_key(&self.store.key_for(a), &self.store.key_for(b));
        let buffer_size = self.buffer_size;
        self.store
            .get_or_compute_stamped(&key, (sig_a, sig_b), || {
                log::debug!("Comparing contents: {} {}", a.display(), b.display());
                contents_equal(a, b, buffer_size)
            })
            .copied()
    }

    /// The underlying store of outcomes.
    #[must_use]
    pub fn store(&self) -> &Store<bool, (Signature, Signature)> {
        &self.store
    }

    /// The underlying store, for bulk eviction.
    pub fn store_mut(&mut self) -> &mut Store<bool, (Signature, Signature)> {
        &mut self.store
    }
}

/// Compare two files chunk by chunk.
fn contents_equal(a: &Path, b: &Path, buffer_size: usize) -> Result<bool, CacheError> {
    let open = |path: &Path| {
        File::open(path)
            .map(|f| BufReader::with_capacity(buffer_size, f))
            .map_err(|source| CacheError::read_failure(path, source))
    };
    let mut reader_a = open(a)?;
    let mut reader_b = open(b)?;

    let mut buf_a = vec![0u8; buffer_size];
    let mut buf_b = vec![0u8; buffer_size];

    loop {
        let n_a = fill(&mut reader_a, &mut buf_a).map_err(|e| CacheError::read_failure(a, e))?;
        let n_b = fill(&mut reader_b, &mut buf_b).map_err(|e| CacheError::read_failure(b, e))?;

        if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
        if n_a == 0 {
            return Ok(true);
        }
    }
}

/// Read until `buf` is full or EOF. Returns bytes read.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
