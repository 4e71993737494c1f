//! The per-day task store.
//!
//! [`DayStore`] is what callers talk to. It loads and saves one day at a
//! time, fixes up records stored under the wrong file name, runs forward
//! migration on a day's first load, and keeps the month stats cache honest
//! by invalidating on every save.
//!
//! Access is assumed to be sequential. Two writers on the same day race and
//! the last write wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::date::DayDate;
use crate::error::{Error, Result};
use crate::migrate::{self, MigrationReport};
use crate::paths::PathResolver;
use crate::record::{DayRecord, Priority, Task, TaskDraft, TaskPatch};
use crate::stats::{MonthStats, StatsAggregator};
use crate::storage::Storage;
use crate::validate::{TaskValidator, MAX_CONTENT_LEN};

/// Behaviour switches for a [`DayStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    pub migration_enabled: bool,
    pub stats_cache_enabled: bool,
    pub max_content_len: usize,
    pub default_priority: Priority,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            migration_enabled: true,
            stats_cache_enabled: true,
            max_content_len: MAX_CONTENT_LEN,
            default_priority: Priority::Normal,
        }
    }
}

impl StoreOptions {
    /// Reduced variant: no migration, no `migrated` flag on disk.
    pub fn simple() -> Self {
        Self {
            migration_enabled: false,
            ..Self::default()
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            migration_enabled: config.store.migration_enabled,
            stats_cache_enabled: config.store.stats_cache_enabled,
            max_content_len: config.tasks.max_content_len,
            default_priority: config.tasks.default_priority()?,
        })
    }
}

/// A loaded day plus what loading it did
#[derive(Debug, Clone, Serialize)]
pub struct LoadedDay {
    pub record: DayRecord,
    /// Present when this load ran forward migration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationReport>,
    /// Stray file that was folded into the canonical location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciled_from: Option<PathBuf>,
}

#[derive(Debug)]
pub struct DayStore {
    resolver: PathResolver,
    stats: StatsAggregator,
    validator: TaskValidator,
    options: StoreOptions,
}

impl DayStore {
    pub fn new(storage: Storage, options: StoreOptions) -> Self {
        Self {
            resolver: PathResolver::new(storage),
            stats: StatsAggregator::new(options.stats_cache_enabled),
            validator: TaskValidator::new(options.max_content_len),
            options,
        }
    }

    /// Open a store at `root` using the `dayplan.toml` found there.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let storage = Storage::new(root);
        let config = Config::load_from_root(storage.root());
        Ok(Self::new(storage, StoreOptions::from_config(&config)?))
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn storage(&self) -> &Storage {
        self.resolver.storage()
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    // =========================================================================
    // Day records
    // =========================================================================

    /// Load a day, creating an empty record if none exists.
    pub fn load(&self, date: &DayDate) -> Result<DayRecord> {
        Ok(self.load_with_report(date)?.record)
    }

    /// Load a day and report migration and reconciliation side effects.
    pub fn load_with_report(&self, date: &DayDate) -> Result<LoadedDay> {
        let located = self.resolver.locate(date)?;
        let mut reconciled_from = None;

        let mut record = match located.actual.as_deref() {
            Some(path) => {
                let mut record: DayRecord = self.storage().read_json(path)?;
                record.date = date.format();
                if located.is_stray() {
                    self.reconcile(date, &record, path)?;
                    reconciled_from = Some(path.to_path_buf());
                }
                record
            }
            None => DayRecord::empty(date, self.options.migration_enabled),
        };

        let migration = if self.options.migration_enabled && !record.is_migrated() {
            let report = migrate::carry_forward(&self.resolver, date, &mut record);
            self.save(date, &record)?;
            Some(report)
        } else {
            None
        };

        Ok(LoadedDay {
            record,
            migration,
            reconciled_from,
        })
    }

    /// Alias of [`DayStore::load`] for the read-day boundary operation.
    pub fn read_day(&self, date: &DayDate) -> Result<DayRecord> {
        self.load(date)
    }

    /// Persist `record` at `date`'s canonical location.
    ///
    /// The stored `date` field is always `date`, whatever `record` says.
    /// Invalidates the month's cached stats once the write has landed.
    pub fn save(&self, date: &DayDate, record: &DayRecord) -> Result<()> {
        let path = self.resolver.canonical_location(date)?;
        let text = date.format();
        if record.date == text {
            self.storage().write_json(&path, record)?;
        } else {
            let mut fixed = record.clone();
            fixed.date = text;
            self.storage().write_json(&path, &fixed)?;
        }
        self.stats.invalidate(date);
        Ok(())
    }

    fn reconcile(&self, date: &DayDate, record: &DayRecord, stray: &Path) -> Result<()> {
        self.save(date, record)?;
        match fs::remove_file(stray) {
            Ok(()) => {
                info!(date = %date, from = %stray.display(), "moved stray day record to canonical path")
            }
            Err(err) => {
                warn!(date = %date, path = %stray.display(), error = %err, "failed to remove stray day record")
            }
        }
        Ok(())
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    /// Validate, stamp and append a new task.
    pub fn add_task(&self, date: &DayDate, draft: TaskDraft) -> Result<Task> {
        self.validator.validate_draft(&draft)?;
        let mut record = self.load(date)?;
        let task = Task::from_draft(draft, self.options.default_priority.clone())?;
        record.tasks.push(task.clone());
        self.save(date, &record)?;
        Ok(task)
    }

    /// Apply a partial update to one task.
    pub fn update_task(&self, date: &DayDate, id: &str, patch: TaskPatch) -> Result<Task> {
        self.validator.validate_patch(&patch)?;
        let mut record = self.load(date)?;
        let task = record
            .find_task_mut(id)
            .ok_or_else(|| not_found(date, id))?;
        task.apply_patch(patch)?;
        let updated = task.clone();
        self.save(date, &record)?;
        Ok(updated)
    }

    /// Remove one task.
    pub fn delete_task(&self, date: &DayDate, id: &str) -> Result<()> {
        let mut record = self.load(date)?;
        let before = record.tasks.len();
        record.tasks.retain(|task| task.id != id);
        if record.tasks.len() == before {
            return Err(not_found(date, id));
        }
        self.save(date, &record)
    }

    // =========================================================================
    // Stats
    // =========================================================================

    pub fn month_stats(&self, year: i32, month: u32) -> Result<MonthStats> {
        self.stats.compute(self.storage(), year, month)
    }
}

fn not_found(date: &DayDate, id: &str) -> Error {
    Error::TaskNotFound {
        date: date.format(),
        id: id.to_string(),
    }
}
