use statcache::clients::{FileComparator, LineCache, OnMissing};
use statcache::config::Config;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all STATCACHE_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("STATCACHE_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_explicit_missing_file_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let absent = dir.path().join("absent.toml");

    let err = Config::try_load(Some(&absent)).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
    assert_eq!(Config::load(Some(&absent)), Config::default());
}

#[test]
fn test_toml_file_overrides_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
on_missing = "empty-default"
search_dirs = ["/usr/share/doc"]
shallow_compare = true
"#,
    )
    .unwrap();

    let config = Config::try_load(Some(&path)).unwrap();
    assert_eq!(config.on_missing, OnMissing::EmptyDefault);
    assert_eq!(config.search_dirs, vec![PathBuf::from("/usr/share/doc")]);
    assert!(config.shallow_compare);
    assert_eq!(config.compare_buffer_size, 8192);
}

#[test]
fn test_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "compare_buffer_size = 1024\nshallow_compare = true\n").unwrap();

    std::env::set_var("STATCACHE_COMPARE_BUFFER_SIZE", "4096");
    std::env::set_var("STATCACHE_ON_MISSING", "empty");
    let config = Config::try_load(Some(&path));
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.compare_buffer_size, 4096);
    assert_eq!(config.on_missing, OnMissing::EmptyDefault);
    assert!(config.shallow_compare);
}

#[test]
fn test_invalid_value_is_reported_and_load_falls_back() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "on_missing = \"explode\"\n").unwrap();

    assert!(Config::try_load(Some(&path)).is_err());
    assert_eq!(Config::load(Some(&path)), Config::default());
}

#[test]
fn test_clients_built_from_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let config = Config {
        on_missing: OnMissing::EmptyDefault,
        normalize_unicode: true,
        ..Config::default()
    };

    let lines = LineCache::from_config(&config);
    assert_eq!(lines.on_missing(), OnMissing::EmptyDefault);
    assert!(lines.store().normalizes_unicode());

    let cmp = FileComparator::from_config(&config);
    assert!(cmp.store().normalizes_unicode());
}
