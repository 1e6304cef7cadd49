//! Bulk eviction operations.
//!
//! Prefix and directory matching works on key strings byte-wise, with no
//! awareness of path boundaries: `forget_by_prefix("/foo")` also drops
//! `/foobar`. Callers that need boundary-aware removal use
//! [`Store::forget_subtree`] instead.
//!
//! Every operation returns how many entries it removed and is a no-op for
//! keys that are not present.

use super::path_utils::KEY_SEPARATOR;
use super::store::Store;

impl<V, S> Store<V, S> {
    /// Remove every entry.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.record_evictions("clear_all", "", removed)
    }

    /// Remove one exact key.
    ///
    /// Returns `true` if an entry was removed.
    pub fn forget(&mut self, key: &str) -> bool {
        let removed = self.remove(key).is_some();
        if removed {
            self.stats.evictions += 1;
            log::trace!("Forgot cache entry: {}", key);
        }
        removed
    }

    /// Remove every key that starts with `prefix`.
    pub fn forget_by_prefix(&mut self, prefix: &str) -> usize {
        let prefix = self.normalize(prefix).into_owned();
        let removed = self.retain_keys(|key| !key.starts_with(prefix.as_str()));
        self.record_evictions("forget_by_prefix", &prefix, removed)
    }

    /// Remove `dir` itself and its direct children.
    ///
    /// A key is a direct child when it is `dir/<name>` or `dir/<name>/` with
    /// no further separator in `<name>`. Deeper entries survive. One trailing
    /// separator on `dir` is ignored, except for the root `/`.
    pub fn forget_directory(&mut self, dir: &str) -> usize {
        let dir = self.normalize(dir).into_owned();
        let dir = trim_trailing_separator(&dir);

        let mut removed = usize::from(self.remove(dir).is_some());

        let mut child_prefix = dir.to_owned();
        if !child_prefix.ends_with(KEY_SEPARATOR) {
            child_prefix.push(KEY_SEPARATOR);
        }
        removed += self.retain_keys(|key| !is_direct_child(key, &child_prefix));

        self.record_evictions("forget_directory", dir, removed)
    }

    /// Keep only keys that start with `prefix`, removing everything else.
    pub fn forget_except_prefix(&mut self, prefix: &str) -> usize {
        let prefix = self.normalize(prefix).into_owned();
        let removed = self.retain_keys(|key| key.starts_with(prefix.as_str()));
        self.record_evictions("forget_except_prefix", &prefix, removed)
    }

    /// Remove `dir` and every key below it at any depth, respecting path
    /// boundaries.
    ///
    /// Unlike [`forget_by_prefix`](Self::forget_by_prefix), a sibling such as
    /// `/foobar` survives `forget_subtree("/foo")`.
    pub fn forget_subtree(&mut self, dir: &str) -> usize {
        let dir = self.normalize(dir).into_owned();
        let dir = trim_trailing_separator(&dir);

        let mut below = dir.to_owned();
        if !below.ends_with(KEY_SEPARATOR) {
            below.push(KEY_SEPARATOR);
        }
        let removed = self.retain_keys(|key| key != dir && !key.starts_with(below.as_str()));
        self.record_evictions("forget_subtree", dir, removed)
    }

    fn retain_keys(&mut self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| keep(key.as_str()));
        before - self.entries.len()
    }

    fn record_evictions(&mut self, op: &str, arg: &str, removed: usize) -> usize {
        self.stats.evictions += removed as u64;
        if removed > 0 {
            log::debug!("{}({:?}) evicted {} entries", op, arg, removed);
        }
        removed
    }
}

fn trim_trailing_separator(dir: &str) -> &str {
    if dir.len() > 1 {
        dir.strip_suffix(KEY_SEPARATOR).unwrap_or(dir)
    } else {
        dir
    }
}

fn is_direct_child(key: &str, child_prefix: &str) -> bool {
    match key.strip_prefix(child_prefix) {
        Some(rest) => {
            let rest = rest.strip_suffix(KEY_SEPARATOR).unwrap_or(rest);
            !rest.contains(KEY_SEPARATOR)
        }
        None => false,
    }
}
