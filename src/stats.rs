//! Monthly task statistics with an invalidation-aware cache.
//!
//! A cached entry is only ever the result of scanning the month directory
//! as it was when computed. Every save into a month must call
//! [`StatsAggregator::invalidate`] so the next query rescans.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::DayDate;
use crate::error::{Error, Result};
use crate::record::DayRecord;
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayCount {
    pub total: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthStats {
    /// Keyed by two-digit day of month
    pub days: BTreeMap<String, DayCount>,
    #[serde(rename = "totalTasks")]
    pub total_tasks: usize,
    #[serde(rename = "completedTasks")]
    pub completed_tasks: usize,
}

impl MonthStats {
    fn add_day(&mut self, day: String, count: DayCount) {
        self.days.insert(day, count);
        self.total_tasks += count.total;
        self.completed_tasks += count.completed;
    }
}

pub type MonthKey = (i32, u32);

#[derive(Debug)]
pub struct StatsAggregator {
    cache: Mutex<HashMap<MonthKey, MonthStats>>,
    enabled: bool,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl StatsAggregator {
    pub fn new(cache_enabled: bool) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            enabled: cache_enabled,
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.enabled
    }

    /// Stats for one month, from cache when possible.
    pub fn compute(&self, storage: &Storage, year: i32, month: u32) -> Result<MonthStats> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidArgument(format!(
                "month must be 1-12, got {month}"
            )));
        }

        if !self.enabled {
            return scan_month(storage, year, month);
        }

        // Held across the scan so a concurrent invalidate cannot slip in
        // between computing and caching.
        let mut cache = self.cache.lock();
        if let Some(stats) = cache.get(&(year, month)) {
            debug!(year, month, "month stats cache hit");
            return Ok(stats.clone());
        }
        let stats = scan_month(storage, year, month)?;
        cache.insert((year, month), stats.clone());
        Ok(stats)
    }

    pub fn get(&self, key: MonthKey) -> Option<MonthStats> {
        self.cache.lock().get(&key).cloned()
    }

    pub fn put(&self, key: MonthKey, stats: MonthStats) {
        if self.enabled {
            self.cache.lock().insert(key, stats);
        }
    }

    /// Drop the cached entry for the month containing `date`.
    pub fn invalidate(&self, date: &DayDate) {
        if self.cache.lock().remove(&date.month_key()).is_some() {
            debug!(year = date.year(), month = date.month(), "month stats invalidated");
        }
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }
}

/// Scan every record file of a month. Corrupt files are skipped so one
/// bad day cannot hide the rest of the month.
pub fn scan_month(storage: &Storage, year: i32, month: u32) -> Result<MonthStats> {
    let mut stats = MonthStats::default();
    let dir = storage.month_dir(year, month);

    for path in storage.list_record_files(&dir)? {
        let record: DayRecord = match storage.read_json(&path) {
            Ok(record) => record,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "skipping unreadable day record");
                continue;
            }
        };

        let day = reporting_day(&record, &path, year, month);
        let count = DayCount {
            total: record.tasks.len(),
            completed: record.completed_count(),
        };
        stats.add_day(day, count);
    }

    Ok(stats)
}

/// The embedded date's day when it belongs to this month, else the file stem.
fn reporting_day(record: &DayRecord, path: &Path, year: i32, month: u32) -> String {
    match record.embedded_date() {
        Some(date) if date.year() == year && date.month() == month => date.day_segment(),
        _ => path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
