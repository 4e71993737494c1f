//! Mapping dates to record files.
//!
//! Every date has exactly one canonical file, `<root>/<YYYY>/<MM>/<DD>.json`.
//! Older data may hold a day's record under some other name in the right
//! month directory; [`PathResolver::locate`] finds those by looking at the
//! `date` field inside each file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::date::DayDate;
use crate::error::Result;
use crate::record::DayRecord;
use crate::storage::Storage;

/// Outcome of looking up a date on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// File currently holding the record, if any
    pub actual: Option<PathBuf>,
    /// Where the record belongs
    pub canonical: PathBuf,
}

impl Located {
    /// A record exists but under a non-canonical name
    pub fn is_stray(&self) -> bool {
        self.actual
            .as_ref()
            .is_some_and(|actual| actual != &self.canonical)
    }
}

#[derive(Debug, Clone)]
pub struct PathResolver {
    storage: Storage,
}

impl PathResolver {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn month_dir(&self, year: i32, month: u32) -> PathBuf {
        self.storage.month_dir(year, month)
    }

    /// Canonical record file for `date`. Creates the month directory.
    pub fn canonical_location(&self, date: &DayDate) -> Result<PathBuf> {
        let path = self.storage.day_file(date);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    /// Find the file holding `date`'s record.
    ///
    /// The canonical file wins when present. Otherwise the month directory
    /// is scanned (one level, file name order) and the first record whose
    /// embedded date matches is returned. Files that cannot be read or
    /// parsed are skipped.
    pub fn locate(&self, date: &DayDate) -> Result<Located> {
        let canonical = self.canonical_location(date)?;
        if canonical.is_file() {
            return Ok(Located {
                actual: Some(canonical.clone()),
                canonical,
            });
        }

        let wanted = date.format();
        let month_dir = self.month_dir(date.year(), date.month());
        for candidate in self.storage.list_record_files(&month_dir)? {
            if embedded_date(&self.storage, &candidate).as_deref() == Some(wanted.as_str()) {
                debug!(date = %wanted, path = %candidate.display(), "found stray day record");
                return Ok(Located {
                    actual: Some(candidate),
                    canonical,
                });
            }
        }

        Ok(Located {
            actual: None,
            canonical,
        })
    }
}

fn embedded_date(storage: &Storage, path: &Path) -> Option<String> {
    match storage.read_json::<DayRecord>(path) {
        Ok(record) => Some(record.date),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "skipping unreadable day record");
            None
        }
    }
}
