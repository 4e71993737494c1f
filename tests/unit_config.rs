use std::fs;

use dayplan::config::Config;
use dayplan::record::Priority;
use dayplan::store::StoreOptions;
use dayplan::Error;

#[test]
fn config_defaults_when_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::load_from_root(dir.path());

    assert!(config.store.migration_enabled);
    assert!(config.store.stats_cache_enabled);
    assert_eq!(config.tasks.max_content_len, 1000);
    assert_eq!(config.tasks.default_priority, "normal");
}

#[test]
fn config_overrides_from_toml() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let toml = r#"
[store]
migration_enabled = false

[tasks]
max_content_len = 80
default_priority = "important"
"#;
    fs::write(dir.path().join("dayplan.toml"), toml)?;

    let config = Config::load_from_root(dir.path());
    assert!(!config.store.migration_enabled);
    assert!(config.store.stats_cache_enabled);
    assert_eq!(config.tasks.max_content_len, 80);

    let options = StoreOptions::from_config(&config)?;
    assert!(!options.migration_enabled);
    assert_eq!(options.max_content_len, 80);
    assert_eq!(options.default_priority, Priority::Important);
    Ok(())
}

#[test]
fn invalid_config_is_rejected_by_load() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dayplan.toml");
    fs::write(&path, "[tasks]\ndefault_priority = \"low\"\n")?;

    assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));

    let config = Config::load_from_root(dir.path());
    assert_eq!(config.tasks.default_priority, "normal");
    Ok(())
}

#[test]
fn saved_config_loads_back() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dayplan.toml");
    let mut config = Config::default();
    config.store.stats_cache_enabled = false;
    config.save(&path)?;

    let loaded = Config::load(&path)?;
    assert!(!loaded.store.stats_cache_enabled);
    assert_eq!(loaded.tasks.max_content_len, config.tasks.max_content_len);
    Ok(())
}
