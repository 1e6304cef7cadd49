//! Invalidation policy.
//!
//! Decides whether a stored signature still describes the live file, and
//! whether two files may be compared by content at all.

use std::path::Path;

use super::signature::Signature;
use super::store::{Entry, Store};

/// Outcome of checking a stored signature against the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Live signature equals the stored one
    Fresh,
    /// The file changed since the entry was stored
    Stale,
    /// The file can no longer be stat'd
    Missing,
}

/// Compare a stored signature with the live one.
///
/// `live` is `None` when the stat call failed.
#[must_use]
pub fn assess(stored: &Signature, live: Option<&Signature>) -> Freshness {
    match live {
        Some(live) if live == stored => Freshness::Fresh,
        Some(_) => Freshness::Stale,
        None => Freshness::Missing,
    }
}

/// Whether two files can be compared by content.
///
/// Only pairs of regular files qualify. Anything else is reported as
/// different by comparators, even when the signatures are identical.
#[must_use]
pub fn comparable(a: &Signature, b: &Signature) -> bool {
    a.is_regular() && b.is_regular()
}

impl<V> Store<V, Signature> {
    /// Revalidate one key against the filesystem, treating the key as a path.
    ///
    /// The entry is evicted unless it is fresh. An absent key reports
    /// [`Freshness::Missing`].
    pub fn check(&mut self, key: &str) -> Freshness {
        let Some(entry) = self.get(key) else {
            return Freshness::Missing;
        };
        let live = live_signature(key, entry);
        let freshness = assess(&entry.stamp, live.as_ref());
        if freshness != Freshness::Fresh {
            self.forget(key);
            log::debug!("check: {:?} entry evicted: {}", freshness, key);
        }
        freshness
    }

    /// Revalidate every entry, evicting stale and missing ones.
    ///
    /// Returns the number of entries evicted.
    pub fn check_all(&mut self) -> usize {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| {
                let live = live_signature(key, entry);
                assess(&entry.stamp, live.as_ref()) != Freshness::Fresh
            })
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.entries.remove(key);
        }
        self.stats.evictions += doomed.len() as u64;
        if !doomed.is_empty() {
            log::debug!("check_all evicted {} entries", doomed.len());
        }
        doomed.len()
    }
}

/// Stat the file behind an entry: its recorded source, else the key.
fn live_signature<V>(key: &str, entry: &Entry<V, Signature>) -> Option<Signature> {
    let path = entry.source.as_deref().unwrap_or_else(|| Path::new(key));
    Signature::of(path).ok()
}
