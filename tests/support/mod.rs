#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use dayplan::storage::Storage;
use dayplan::{DayDate, DayStore, StoreOptions};
use serde_json::Value;
use tempfile::TempDir;

pub struct TestRoot {
    dir: TempDir,
}

impl TestRoot {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> DayStore {
        self.store_with(StoreOptions::default())
    }

    pub fn store_with(&self, options: StoreOptions) -> DayStore {
        DayStore::new(Storage::new(self.dir.path()), options)
    }

    /// Write a raw file relative to the root, e.g. `2024/03/15.json`.
    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn day_path(&self, date: &str) -> PathBuf {
        let date = date_of(date);
        Storage::new(self.dir.path()).day_file(&date)
    }

    pub fn read_day(&self, date: &str) -> Result<Value, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.day_path(date))?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn month_files(&self, year: &str, month: &str) -> Vec<String> {
        let dir = self.dir.path().join(year).join(month);
        let mut names: Vec<String> = match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

pub fn date_of(text: &str) -> DayDate {
    DayDate::parse(text).expect("valid test date")
}

pub fn dayplan_cmd(root: &TestRoot) -> Command {
    let mut cmd = Command::cargo_bin("dayplan").expect("dayplan binary");
    cmd.env_remove("RUST_LOG")
        .env("DAYPLAN_ROOT", root.path());
    cmd
}
