//! Client wrappers built on the cache store.
//!
//! Each wrapper owns its own [`Store`](crate::cache::Store) and decides for
//! itself how to degrade on failure:
//!
//! - [`lines`]: whole-file line reader with an opt-in empty default.
//! - [`compare`]: pairwise content comparison with memoized outcomes.
//! - [`stat`]: memoized stat lookups, evicted explicitly.
//! - [`dircmp`]: one-level directory comparison built on the two above.

pub mod compare;
pub mod dircmp;
pub mod lines;
pub mod stat;

pub use compare::FileComparator;
pub use dircmp::{DirComparer, DirComparison};
pub use lines::{LineCache, OnMissing};
pub use stat::StatCache;
