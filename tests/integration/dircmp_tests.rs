use statcache::clients::DirComparer;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_classifies_top_level_entries() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    let (l, r) = (left.path(), right.path());

    fs::write(l.join("same.txt"), "same").unwrap();
    fs::write(r.join("same.txt"), "same").unwrap();
    fs::write(l.join("changed.txt"), "left").unwrap();
    fs::write(r.join("changed.txt"), "right!").unwrap();
    fs::write(l.join("only_left.txt"), "l").unwrap();
    fs::write(r.join("only_right.txt"), "r").unwrap();
    fs::create_dir(l.join("sub")).unwrap();
    fs::create_dir(r.join("sub")).unwrap();
    fs::write(l.join("sub").join("deep.txt"), "ignored").unwrap();
    fs::write(l.join("mixed"), "file").unwrap();
    fs::create_dir(r.join("mixed")).unwrap();

    let mut comparer = DirComparer::new();
    let result = comparer.compare(l, r).unwrap();

    assert_eq!(result.same_files, vec!["same.txt"]);
    assert_eq!(result.diff_files, vec!["changed.txt"]);
    assert_eq!(result.left_only, vec!["only_left.txt"]);
    assert_eq!(result.right_only, vec!["only_right.txt"]);
    assert_eq!(result.common_dirs, vec!["sub"]);
    assert_eq!(result.funny, vec!["mixed"]);
    assert!(!result.is_identical());

    let report = result.report();
    assert!(report.contains("Only in left"));
    assert!(report.contains("changed.txt"));
}

#[test]
fn test_identical_directories() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    for dir in [left.path(), right.path()] {
        fs::write(dir.join("a.txt"), "alpha").unwrap();
        fs::write(dir.join("b.txt"), "beta").unwrap();
    }

    let mut comparer = DirComparer::new();
    let result = comparer.compare(left.path(), right.path()).unwrap();
    assert!(result.is_identical());
    assert_eq!(result.same_files, vec!["a.txt", "b.txt"]);
}

#[test]
fn test_rescan_notices_added_and_removed_files() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    fs::write(left.path().join("a.txt"), "alpha").unwrap();
    fs::write(right.path().join("a.txt"), "alpha").unwrap();

    let mut comparer = DirComparer::new();
    assert!(comparer.compare(left.path(), right.path()).unwrap().is_identical());

    fs::write(left.path().join("new.txt"), "new").unwrap();
    fs::remove_file(right.path().join("a.txt")).unwrap();

    let result = comparer.compare(left.path(), right.path()).unwrap();
    assert_eq!(result.left_only, vec!["a.txt", "new.txt"]);
    assert!(result.right_only.is_empty());
}

#[test]
fn test_missing_directory_is_an_error() {
    let left = tempdir().unwrap();
    let missing = left.path().join("nope");

    let mut comparer = DirComparer::new();
    let err = comparer.compare(left.path(), &missing).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_json_serialization() {
    let left = tempdir().unwrap();
    let right = tempdir().unwrap();
    fs::write(left.path().join("x.txt"), "x").unwrap();

    let mut comparer = DirComparer::new();
    let result = comparer.compare(left.path(), right.path()).unwrap();
    let json: serde_json::Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["left_only"][0], "x.txt");
    assert!(json["right_only"].as_array().unwrap().is_empty());
}
