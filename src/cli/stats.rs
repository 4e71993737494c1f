//! dayplan stats command implementation.

use crate::cli::Context;
use crate::error::Result;
use crate::output::{emit_success, HumanReport};
use crate::stats::MonthStats;

pub fn run_stats(ctx: &Context, year: i32, month: u32) -> Result<()> {
    let store = ctx.store()?;
    let stats = store.month_stats(year, month)?;

    let human = stats_report(year, month, &stats);
    emit_success(ctx.output, "stats", &stats, &human)
}

fn stats_report(year: i32, month: u32, stats: &MonthStats) -> HumanReport {
    let mut human = HumanReport::new(format!("Stats {year:04}-{month:02}"));
    human.field("Days with records", stats.days.len().to_string());
    human.field("Tasks", stats.total_tasks.to_string());
    human.field("Completed", stats.completed_tasks.to_string());
    human.field("Completion", completion_rate(stats));

    for (day, count) in &stats.days {
        human.line(format!("{day}: {}/{} done", count.completed, count.total));
    }
    human
}

fn completion_rate(stats: &MonthStats) -> String {
    if stats.total_tasks == 0 {
        return "-".to_string();
    }
    let percent = stats.completed_tasks as f64 * 100.0 / stats.total_tasks as f64;
    format!("{percent:.1}%")
}
