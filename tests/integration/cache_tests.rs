use filetime::{set_file_mtime, FileTime};
use statcache::cache::{CacheError, Freshness, Store};
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn read_string(path: &Path) -> Result<String, CacheError> {
    fs::read_to_string(path).map_err(|source| CacheError::ReadFailure {
        path: path.to_path_buf(),
        source,
    })
}

#[test]
fn test_recompute_after_file_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("greeting.txt");
    fs::write(&path, "hello").unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(1_000_000, 0)).unwrap();

    let mut store: Store<String> = Store::new();
    let calls = Cell::new(0);
    let compute = |p: &Path| {
        calls.set(calls.get() + 1);
        read_string(p)
    };

    assert_eq!(store.get_or_compute(&path, compute).unwrap(), "hello");
    assert_eq!(store.get_or_compute(&path, compute).unwrap(), "hello");
    assert_eq!(calls.get(), 1);

    fs::write(&path, "hello world").unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(2_000_000, 0)).unwrap();

    assert_eq!(store.get_or_compute(&path, compute).unwrap(), "hello world");
    assert_eq!(calls.get(), 2);

    let stats = store.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.invalidations, 1);
}

#[test]
fn test_mtime_only_change_invalidates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("same_size.txt");
    fs::write(&path, "aaaa").unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(1_000_000, 0)).unwrap();

    let mut store: Store<String> = Store::new();
    store.get_or_compute(&path, read_string).unwrap();

    fs::write(&path, "bbbb").unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(1_000_001, 0)).unwrap();

    assert_eq!(store.get_or_compute(&path, read_string).unwrap(), "bbbb");
}

#[test]
fn test_deleted_file_is_evicted_and_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gone.txt");
    fs::write(&path, "soon gone").unwrap();

    let mut store: Store<String> = Store::new();
    store.get_or_compute(&path, read_string).unwrap();
    assert_eq!(store.len(), 1);

    fs::remove_file(&path).unwrap();
    let err = store.get_or_compute(&path, read_string).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.path(), path.as_path());
    assert!(store.is_empty());
}

#[test]
fn test_compute_failure_is_not_cached() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("flaky.txt");
    fs::write(&path, "data").unwrap();

    let mut store: Store<String> = Store::new();
    let result: Result<&String, anyhow::Error> =
        store.get_or_compute(&path, |_| Err(anyhow::anyhow!("transient")));
    assert!(result.is_err());
    assert!(store.is_empty());

    // A later success is stored normally
    assert_eq!(store.get_or_compute(&path, read_string).unwrap(), "data");
    assert_eq!(store.len(), 1);
}

#[test]
fn test_check_reports_freshness() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("watched.txt");
    fs::write(&path, "v1").unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(1_000_000, 0)).unwrap();

    let mut store: Store<String> = Store::new();
    store.get_or_compute(&path, read_string).unwrap();
    let key = store.key_for(&path);

    assert_eq!(store.check(&key), Freshness::Fresh);

    fs::write(&path, "v2 longer").unwrap();
    assert_eq!(store.check(&key), Freshness::Stale);
    assert!(!store.contains_key(&key));

    assert_eq!(store.check(&key), Freshness::Missing);
}

#[test]
fn test_check_all_drops_only_stale() {
    let dir = tempdir().unwrap();
    let kept = dir.path().join("kept.txt");
    let changed = dir.path().join("changed.txt");
    let removed = dir.path().join("removed.txt");
    for path in [&kept, &changed, &removed] {
        fs::write(path, "x").unwrap();
    }

    let mut store: Store<String> = Store::new();
    for path in [&kept, &changed, &removed] {
        store.get_or_compute(path, read_string).unwrap();
    }

    fs::write(&changed, "xyz").unwrap();
    fs::remove_file(&removed).unwrap();

    assert_eq!(store.check_all(), 2);
    assert_eq!(store.len(), 1);
    assert!(store.contains_key(&store.key_for(&kept)));
}
