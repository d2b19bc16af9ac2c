//! Configuration loading and validation tests.

use std::fs;

use tempfile::TempDir;

use dropwatch::config::Config;
use dropwatch::error::{ConfigError, Error};

#[test]
fn empty_config_uses_defaults() {
    let config = Config::parse_toml("").unwrap();

    assert_eq!(config.storage.path, "tracking.json");
    assert_eq!(config.catalog.timeout_secs, 10);
    assert_eq!(config.watcher.interval_secs, 600);
    assert_eq!(config.watcher.request_delay_secs, 2);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn full_config_parses() {
    let toml = r#"
[storage]
path = "/var/lib/dropwatch/tracking.json"

[catalog]
api_url = "https://card.wb.ru/cards/v4/detail"
timeout_secs = 5

[watcher]
interval_secs = 120
request_delay_secs = 1

[logging]
level = "debug"
format = "json"
"#;

    let config = Config::parse_toml(toml).unwrap();
    assert_eq!(config.storage.path, "/var/lib/dropwatch/tracking.json");
    assert_eq!(config.catalog.timeout_secs, 5);
    assert_eq!(config.watcher.interval_secs, 120);
    assert_eq!(config.logging.format, "json");
}

#[test]
fn config_rejects_zero_interval() {
    let toml = r#"
[watcher]
interval_secs = 0
"#;

    match Config::parse_toml(toml) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "watcher.interval_secs",
            ..
        })) => {}
        other => panic!("expected zero interval to be rejected, got {other:?}"),
    }
}

#[test]
fn config_rejects_empty_storage_path() {
    let toml = r#"
[storage]
path = ""
"#;

    assert!(matches!(
        Config::parse_toml(toml),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "storage.path",
            ..
        }))
    ));
}

#[test]
fn config_rejects_malformed_toml() {
    assert!(matches!(
        Config::parse_toml("[watcher"),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn load_or_default_tolerates_a_missing_file() {
    let config = Config::load_or_default("/definitely/not/here/dropwatch.toml").unwrap();
    assert_eq!(config.storage.path, "tracking.json");
}

#[test]
fn load_reads_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dropwatch.toml");
    fs::write(&path, "[watcher]\ninterval_secs = 42\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.watcher.interval_secs, 42);
}
