//! dayplan - per-day task store
//!
//! This library provides the storage core of a day planner: one JSON record
//! per calendar day, kept under `<root>/<YYYY>/<MM>/<DD>.json`.
//!
//! # Core Concepts
//!
//! - **Canonical location**: the one file path a date maps to
//! - **Stray file**: a record whose file name disagrees with its `date` field;
//!   found on load and moved to the canonical location
//! - **Migration**: on a day's first load, unfinished tasks of the previous
//!   day are copied in, tagged with `from_date`
//! - **Month stats**: per-day and total task counts, cached per month and
//!   invalidated by every save into that month
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `dayplan.toml`
//! - `date`: `YYYY-MM-DD` parsing and formatting
//! - `error`: Error types and result aliases
//! - `migrate`: Forward migration of unfinished tasks
//! - `output`: Human and JSON output for the CLI
//! - `paths`: Date to file resolution and stray-file lookup
//! - `record`: Day record and task types
//! - `stats`: Monthly aggregation and its cache
//! - `storage`: Data root layout and atomic JSON I/O
//! - `store`: The day store tying it all together
//! - `validate`: Task payload validation

pub mod cli;
pub mod config;
pub mod date;
pub mod error;
pub mod migrate;
pub mod output;
pub mod paths;
pub mod record;
pub mod stats;
pub mod storage;
pub mod store;
pub mod validate;

pub use date::DayDate;
pub use error::{Error, Result};
pub use record::{DayRecord, Priority, Task, TaskDraft, TaskPatch};
pub use store::{DayStore, StoreOptions};
