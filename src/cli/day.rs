//! dayplan show/add/update/rm command implementations.

use serde::Serialize;

use crate::cli::Context;
use crate::date::DayDate;
use crate::error::Result;
use crate::output::{emit_success, HumanReport};
use crate::record::{Task, TaskDraft, TaskPatch};
use crate::store::LoadedDay;

pub struct AddOptions {
    pub date: DayDate,
    pub content: String,
    pub priority: Option<String>,
}

pub struct UpdateOptions {
    pub date: DayDate,
    pub id: String,
    pub content: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
}

impl UpdateOptions {
    pub fn completed(date: DayDate, id: String, completed: bool) -> Self {
        Self {
            date,
            id,
            content: None,
            priority: None,
            completed: Some(completed),
        }
    }
}

#[derive(Serialize)]
struct DeletedOutput<'a> {
    date: String,
    id: &'a str,
    deleted: bool,
}

pub fn run_show(ctx: &Context, date: &DayDate) -> Result<()> {
    let store = ctx.store()?;
    let loaded = store.load_with_report(date)?;

    let human = show_report(&loaded);
    emit_success(ctx.output, "show", &loaded.record, &human)
}

pub fn run_add(ctx: &Context, options: AddOptions) -> Result<()> {
    let store = ctx.store()?;
    let mut draft = TaskDraft::new(options.content);
    draft.priority = options.priority;
    let task = store.add_task(&options.date, draft)?;

    let mut human = HumanReport::new("Task added");
    task_fields(&mut human, &options.date, &task);
    emit_success(ctx.output, "add", &task, &human)
}

pub fn run_update(ctx: &Context, options: UpdateOptions) -> Result<()> {
    let store = ctx.store()?;
    let patch = TaskPatch {
        content: options.content,
        priority: options.priority,
        completed: options.completed,
        ..TaskPatch::default()
    };
    let no_changes = patch.is_empty();
    let task = store.update_task(&options.date, &options.id, patch)?;

    let mut human = HumanReport::new("Task updated");
    task_fields(&mut human, &options.date, &task);
    if no_changes {
        human.note("no fields given; task left unchanged");
    }
    emit_success(ctx.output, "update", &task, &human)
}

pub fn run_rm(ctx: &Context, date: &DayDate, id: &str) -> Result<()> {
    let store = ctx.store()?;
    store.delete_task(date, id)?;

    let output = DeletedOutput {
        date: date.format(),
        id,
        deleted: true,
    };
    let mut human = HumanReport::new("Task deleted");
    human.field("Date", date.format());
    human.field("ID", id);
    emit_success(ctx.output, "rm", &output, &human)
}

fn show_report(loaded: &LoadedDay) -> HumanReport {
    let record = &loaded.record;
    let mut human = HumanReport::new(format!("Day {}", record.date));
    human.field("Tasks", record.tasks.len().to_string());
    human.field("Completed", record.completed_count().to_string());

    for task in &record.tasks {
        human.line(task_line(task));
    }

    if let Some(report) = loaded.migration.as_ref().filter(|report| report.migrated > 0) {
        let from = report
            .from
            .map(|date| date.format())
            .unwrap_or_default();
        human.note(format!(
            "carried {} unfinished task(s) from {from}",
            report.migrated
        ));
    }
    if let Some(path) = &loaded.reconciled_from {
        human.note(format!(
            "moved record from {} to its canonical file",
            path.display()
        ));
    }
    if record.tasks.is_empty() {
        human.hint(format!("dayplan add {} \"...\"", record.date));
    }
    human
}

fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{mark}] {} ({}) {}", task.id, task.priority, task.content);
    if let Some(from) = task.from_date {
        line.push_str(&format!(" <- {from}"));
    }
    line
}

fn task_fields(human: &mut HumanReport, date: &DayDate, task: &Task) {
    human.field("Date", date.format());
    human.field("ID", task.id.clone());
    human.field("Content", task.content.clone());
    human.field("Priority", task.priority.to_string());
    human.field("Completed", task.completed.to_string());
}
