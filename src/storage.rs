//! Storage layer for dayplan
//!
//! All state lives under one data root:
//!
//! ```text
//! <root>/
//!   dayplan.toml                # Optional configuration
//!   2024/                       # Year
//!     03/                       # Month (two digits)
//!       15.json                 # Day record for 2024-03-15
//!       16.json
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::date::{month_segment, DayDate};
use crate::error::Result;

/// Extension of day record files
pub const RECORD_EXT: &str = "json";

/// Name of the configuration file inside the data root
pub const CONFIG_FILE: &str = "dayplan.toml";

/// Storage manager for dayplan state
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Create a storage manager rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Path to the data root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the configuration file
    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Directory holding every record of one month
    pub fn month_dir(&self, year: i32, month: u32) -> PathBuf {
        self.root
            .join(format!("{year:04}"))
            .join(month_segment(month))
    }

    /// Canonical record file of a date (no side effects)
    pub fn day_file(&self, date: &DayDate) -> PathBuf {
        self.month_dir(date.year(), date.month())
            .join(format!("{}.{RECORD_EXT}", date.day_segment()))
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Create the data root if it does not exist
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Check if the data root exists
    pub fn is_initialized(&self) -> bool {
        self.root.is_dir()
    }

    // =========================================================================
    // File I/O helpers (atomic writes for safety)
    // =========================================================================

    /// Write pretty JSON atomically (temp file in the same directory, then rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let mut json = serde_json::to_string_pretty(data)?;
        json.push('\n');
        self.write_atomic(path, json.as_bytes())
    }

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Write data atomically using temp file + rename
    ///
    /// Readers see either the previous file or the new one, never a
    /// partial write.
    pub fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(data)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|err| err.error)?;

        Ok(())
    }

    /// Record files directly inside `dir`, sorted by file name.
    ///
    /// A missing directory is an empty listing. Entries that cannot be read
    /// are skipped.
    pub fn list_record_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|ext| ext.to_str()) == Some(RECORD_EXT)
            })
            .collect();
        files.sort();
        Ok(files)
    }
}
