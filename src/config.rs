//! Configuration loading and management
//!
//! Handles parsing of the `dayplan.toml` file kept in the data root.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::record::Priority;
use crate::storage::CONFIG_FILE;
use crate::validate::MAX_CONTENT_LEN;

/// Environment variable naming the data root
pub const ROOT_ENV: &str = "DAYPLAN_ROOT";

const CONTENT_LEN_CEILING: usize = 100_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store behaviour switches
    #[serde(default)]
    pub store: StoreConfig,

    /// Task admission rules
    #[serde(default)]
    pub tasks: TasksConfig,
}

/// Store behaviour switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Carry unfinished tasks into a day on its first load
    #[serde(default = "default_true")]
    pub migration_enabled: bool,

    /// Keep computed month stats in memory until a save invalidates them
    #[serde(default = "default_true")]
    pub stats_cache_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            migration_enabled: true,
            stats_cache_enabled: true,
        }
    }
}

/// Tasks configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    /// Maximum task content length in characters, after trimming
    #[serde(default = "default_max_content_len")]
    pub max_content_len: usize,

    /// Priority given to new tasks that do not name one
    #[serde(default = "default_priority")]
    pub default_priority: String,
}

fn default_max_content_len() -> usize {
    MAX_CONTENT_LEN
}

fn default_priority() -> String {
    Priority::default().to_string()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            max_content_len: default_max_content_len(),
            default_priority: default_priority(),
        }
    }
}

impl TasksConfig {
    /// Parsed default priority
    pub fn default_priority(&self) -> crate::error::Result<Priority> {
        self.default_priority.parse().map_err(|_| {
            crate::error::Error::InvalidConfig(format!(
                "tasks.default_priority: unknown priority '{}' (expected normal|important|urgent)",
                self.default_priority
            ))
        })
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.max_content_len == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "tasks.max_content_len must be >= 1".to_string(),
            ));
        }
        if self.max_content_len > CONTENT_LEN_CEILING {
            return Err(crate::error::Error::InvalidConfig(format!(
                "tasks.max_content_len must be <= {CONTENT_LEN_CEILING}"
            )));
        }
        self.default_priority()?;
        Ok(())
    }
}

impl Config {
    /// Load configuration from a `dayplan.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a data root, or return defaults
    pub fn load_from_root(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match Self::load(&config_path) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!(
                        path = %config_path.display(),
                        error = %err,
                        "ignoring invalid config"
                    );
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.tasks.validate()?;
        Ok(())
    }
}

/// Pick the data root: explicit flag, then `DAYPLAN_ROOT`, then the
/// platform data directory, then `./data`.
pub fn resolve_root(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(root) = explicit {
        return root;
    }
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(root);
    }
    directories::ProjectDirs::from("", "", "dayplan")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_full_variant() {
        let config = Config::default();
        assert!(config.store.migration_enabled);
        assert!(config.store.stats_cache_enabled);
        assert_eq!(config.tasks.max_content_len, 1000);
        assert_eq!(config.tasks.default_priority().unwrap(), Priority::Normal);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("[store]\nmigration_enabled = false\n").unwrap();
        assert!(!config.store.migration_enabled);
        assert!(config.store.stats_cache_enabled);
        assert_eq!(config.tasks.max_content_len, 1000);
    }

    #[test]
    fn validate_rejects_bad_priority() {
        let config: Config = toml::from_str("[tasks]\ndefault_priority = \"low\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_root_wins() {
        let root = resolve_root(Some(PathBuf::from("/tmp/plans")));
        assert_eq!(root, PathBuf::from("/tmp/plans"));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.store.stats_cache_enabled = false;
        config.tasks.max_content_len = 50;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert!(!loaded.store.stats_cache_enabled);
        assert_eq!(loaded.tasks.max_content_len, 50);
    }
}
