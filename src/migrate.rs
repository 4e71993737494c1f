//! Carrying unfinished tasks forward into a new day.
//!
//! The first load of a day copies every incomplete task of the previous
//! day into it, once. The previous day is only read, never migrated or
//! reconciled itself, so the walk back is exactly one day deep.

use serde::Serialize;
use tracing::{info, warn};

use crate::date::DayDate;
use crate::error::Result;
use crate::paths::PathResolver;
use crate::record::DayRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Day the tasks were carried from
    pub from: Option<DayDate>,
    /// Number of tasks appended
    pub migrated: usize,
}

/// Pull forward yesterday's unfinished tasks and mark `record` migrated.
///
/// Failures reading the previous day count as nothing to migrate; the flag
/// is still set so the day is not retried on every load. The caller is
/// responsible for persisting `record`.
pub fn carry_forward(
    resolver: &PathResolver,
    date: &DayDate,
    record: &mut DayRecord,
) -> MigrationReport {
    let from = date.pred();
    let migrated = match from {
        Some(prev) => match pull_from(resolver, &prev, record) {
            Ok(count) => count,
            Err(err) => {
                warn!(date = %date, from = %prev, error = %err, "task migration failed");
                0
            }
        },
        None => {
            warn!(date = %date, "no previous day to migrate from");
            0
        }
    };

    if migrated > 0 {
        if let Some(prev) = from {
            info!(date = %date, from = %prev, count = migrated, "migrated unfinished tasks");
        }
    }

    record.migrated = Some(true);
    MigrationReport { from, migrated }
}

fn pull_from(resolver: &PathResolver, prev: &DayDate, record: &mut DayRecord) -> Result<usize> {
    let located = resolver.locate(prev)?;
    let Some(path) = located.actual else {
        return Ok(0);
    };

    let previous: DayRecord = resolver.storage().read_json(&path)?;

    let mut count = 0;
    for task in previous.tasks {
        if task.completed || record.contains_task(&task.id) {
            continue;
        }
        let mut carried = task;
        carried.from_date = Some(*prev);
        record.tasks.push(carried);
        count += 1;
    }
    Ok(count)
}
