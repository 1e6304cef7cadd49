use statcache::cache::Store;
use std::collections::BTreeSet;

fn store_with(keys: &[&str]) -> Store<u32, ()> {
    let mut store = Store::new();
    for (i, key) in keys.iter().enumerate() {
        store.insert(*key, (), i as u32);
    }
    store
}

fn keys_of(store: &Store<u32, ()>) -> BTreeSet<String> {
    store.keys().map(str::to_owned).collect()
}

fn set(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|k| (*k).to_owned()).collect()
}

#[test]
fn test_forget_by_prefix_is_bytewise() {
    let mut store = store_with(&["/a", "/a/b", "/ab", "/c"]);
    assert_eq!(store.forget_by_prefix("/a"), 3);
    assert_eq!(keys_of(&store), set(&["/c"]));
}

#[test]
fn test_forget_directory_keeps_grandchildren() {
    let mut store = store_with(&["/d", "/d/x", "/d/y/z"]);
    assert_eq!(store.forget_directory("/d"), 2);
    assert_eq!(keys_of(&store), set(&["/d/y/z"]));
}

#[test]
fn test_forget_directory_trailing_separator() {
    let mut store = store_with(&["/d", "/d/x", "/d/sub/", "/d/sub/inner", "/dx"]);
    assert_eq!(store.forget_directory("/d/"), 3);
    assert_eq!(keys_of(&store), set(&["/d/sub/inner", "/dx"]));
}

#[test]
fn test_forget_except_prefix() {
    let mut store = store_with(&["/proj/a", "/proj/b/c", "/other", "/projector"]);
    assert_eq!(store.forget_except_prefix("/proj/"), 2);
    assert_eq!(keys_of(&store), set(&["/proj/a", "/proj/b/c"]));
}

#[test]
fn test_forget_subtree_respects_boundaries() {
    let mut store = store_with(&["/a", "/a/b", "/a/b/c", "/ab"]);
    assert_eq!(store.forget_subtree("/a"), 3);
    assert_eq!(keys_of(&store), set(&["/ab"]));
}

#[test]
fn test_forget_and_clear_all() {
    let mut store = store_with(&["/x", "/y", "/z"]);
    assert!(store.forget("/x"));
    assert!(!store.forget("/x"));
    assert!(!store.forget("/missing"));
    assert_eq!(store.clear_all(), 2);
    assert!(store.is_empty());
    assert_eq!(store.stats().evictions, 3);
}

#[test]
fn test_operations_on_empty_store() {
    let mut store: Store<u32, ()> = Store::new();
    assert_eq!(store.clear_all(), 0);
    assert_eq!(store.forget_by_prefix(""), 0);
    assert_eq!(store.forget_directory("/"), 0);
    assert_eq!(store.forget_except_prefix("/"), 0);
    assert!(store.is_empty());
}

#[test]
fn test_empty_prefix_matches_everything() {
    let mut store = store_with(&["/a", "b", ""]);
    assert_eq!(store.forget_except_prefix(""), 0);
    assert_eq!(store.forget_by_prefix(""), 3);
    assert!(store.is_empty());
}
