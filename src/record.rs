//! Day records and the tasks they own.
//!
//! On disk a record is one JSON object per day:
//!
//! ```text
//! {
//!   "date": "2024-03-15",
//!   "tasks": [
//!     { "id": "20240315093000123456", "content": "Buy milk",
//!       "priority": "normal", "completed": false,
//!       "createdAt": "2024-03-15T09:30:00.123456" }
//!   ],
//!   "migrated": true
//! }
//! ```
//!
//! Fields this crate does not know about are kept in `extra` and written
//! back untouched, so other clients of the same data directory do not lose
//! data when we rewrite a day.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDateTime};
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::date::DayDate;
use crate::error::{Error, Result};

const TASK_ID_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// Patch keys that map onto typed fields or must never be overwritten.
const RESERVED_TASK_KEYS: [&str; 6] = [
    "id",
    "content",
    "priority",
    "completed",
    "createdAt",
    "from_date",
];

static LAST_TASK_STAMP: Mutex<Option<NaiveDateTime>> = Mutex::new(None);

/// Task priority.
///
/// New tasks only ever get one of the three known values. Records written
/// by other clients may hold anything else; such values are kept verbatim
/// in `Other` so rewriting the day does not lose them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Priority {
    #[default]
    Normal,
    Important,
    Urgent,
    Other(String),
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Normal, Priority::Important, Priority::Urgent];

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Normal => "normal",
            Priority::Important => "important",
            Priority::Urgent => "urgent",
            Priority::Other(value) => value,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Priority::Other(_))
    }

    /// Lenient mapping for stored text.
    fn from_stored(value: String) -> Self {
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == value)
            .unwrap_or_else(|| Priority::Other(value))
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(value) => Priority::from_stored(value),
            Value::Null => Priority::default(),
            other => Priority::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == value)
            .ok_or_else(|| {
                Error::validation(
                    "priority",
                    format!("unknown priority '{value}' (expected normal|important|urgent)"),
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    /// Set on tasks carried forward from the previous day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<DayDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Build a fresh, incomplete task from an already validated draft.
    pub fn from_draft(draft: TaskDraft, default_priority: Priority) -> Result<Self> {
        let priority = match draft.priority.as_deref() {
            Some(value) => value.parse()?,
            None => default_priority,
        };
        let (id, created_at) = next_task_id();
        let mut extra = draft.extra;
        strip_reserved(&mut extra);

        Ok(Self {
            id,
            content: draft.content,
            priority,
            completed: false,
            created_at: Some(created_at),
            from_date: None,
            extra,
        })
    }

    /// Merge an already validated patch into this task.
    pub fn apply_patch(&mut self, patch: TaskPatch) -> Result<()> {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(priority) = patch.priority.as_deref() {
            self.priority = priority.parse()?;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        let mut extra = patch.extra;
        strip_reserved(&mut extra);
        self.extra.extend(extra);
        Ok(())
    }
}

/// Payload for creating a task, as handed over by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

/// Partial update. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.extra.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayRecord {
    /// Canonical date text. Kept as text so records with a damaged date
    /// still load for aggregation.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// Only written when forward migration is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrated: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DayRecord {
    /// Empty record for a day with no file yet.
    pub fn empty(date: &DayDate, track_migration: bool) -> Self {
        Self {
            date: date.format(),
            tasks: Vec::new(),
            migrated: track_migration.then_some(false),
            extra: Map::new(),
        }
    }

    pub fn is_migrated(&self) -> bool {
        self.migrated.unwrap_or(false)
    }

    pub fn contains_task(&self, id: &str) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub fn find_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// The embedded date, if it parses.
    pub fn embedded_date(&self) -> Option<DayDate> {
        DayDate::parse(&self.date)
    }
}

/// Next task id plus its creation time.
///
/// Ids are the local creation time down to the microsecond. Within one
/// process they strictly increase: a clash with the previous id bumps the
/// stamp by one microsecond.
pub fn next_task_id() -> (String, NaiveDateTime) {
    let now = truncate_to_micros(Local::now().naive_local());
    let mut last = LAST_TASK_STAMP.lock();
    let stamp = match *last {
        Some(previous) if now <= previous => previous + Duration::microseconds(1),
        _ => now,
    };
    *last = Some(stamp);
    (stamp.format(TASK_ID_FORMAT).to_string(), now)
}

/// Ids only carry microseconds, so stamps are compared at that precision.
fn truncate_to_micros(stamp: NaiveDateTime) -> NaiveDateTime {
    let nanos = stamp.and_utc().timestamp_subsec_nanos() % 1_000;
    stamp - Duration::nanoseconds(i64::from(nanos))
}

/// Older records may store ids as JSON numbers. They are read as text and
/// written back as text.
fn id_from_text_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "task id must be a string or number, got {other}"
        ))),
    }
}

fn strip_reserved(extra: &mut Map<String, Value>) {
    for key in RESERVED_TASK_KEYS {
        extra.remove(key);
    }
}
