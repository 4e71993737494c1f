//! How command results reach the terminal.
//!
//! Every command builds a [`HumanReport`] and hands it to [`emit_success`]
//! together with its structured payload. With `--json` only the payload is
//! printed, wrapped in a versioned envelope; otherwise the report is
//! rendered as plain text:
//!
//! ```text
//! Day 2024-03-15
//!
//!   Tasks      2
//!   Completed  1
//!
//!   [x] 20240315093000123456 (normal) Buy milk
//!   [ ] 20240315093100654321 (urgent) Call the bank <- 2024-03-14
//!
//! note: carried 1 unfinished task(s) from 2024-03-14
//! ```

use serde::Serialize;

use crate::error::{exit_codes, Error, Result};

pub const SCHEMA_VERSION: &str = "dayplan.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Plain-text rendering of one command's outcome
#[derive(Debug, Clone, Default)]
pub struct HumanReport {
    title: String,
    fields: Vec<(String, String)>,
    lines: Vec<String>,
    notes: Vec<String>,
    hints: Vec<String>,
}

impl HumanReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Labelled value, shown in an aligned block under the title.
    pub fn field(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.fields.push((label.into(), value.into()));
    }

    /// Free-form line, e.g. one task.
    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Side effect or caveat the user should know about.
    pub fn note(&mut self, text: impl Into<String>) {
        self.notes.push(text.into());
    }

    /// Suggested follow-up command.
    pub fn hint(&mut self, text: impl Into<String>) {
        self.hints.push(text.into());
    }

    pub fn render(&self) -> String {
        let mut out = self.title.clone();

        if !self.fields.is_empty() {
            let width = self
                .fields
                .iter()
                .map(|(label, _)| label.chars().count())
                .max()
                .unwrap_or(0);
            out.push('\n');
            for (label, value) in &self.fields {
                out.push_str(&format!("\n  {label:<width$}  {value}"));
            }
        }

        if !self.lines.is_empty() {
            out.push('\n');
            for line in &self.lines {
                out.push_str(&format!("\n  {line}"));
            }
        }

        if !self.notes.is_empty() || !self.hints.is_empty() {
            out.push('\n');
        }
        for note in &self.notes {
            out.push_str(&format!("\nnote: {note}"));
        }
        for hint in &self.hints {
            out.push_str(&format!("\ntry:  {hint}"));
        }

        out
    }
}

#[derive(Serialize)]
struct SuccessEnvelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    data: &'a T,
    #[serde(skip_serializing_if = "is_empty")]
    notes: &'a [String],
    #[serde(skip_serializing_if = "is_empty")]
    hints: &'a [String],
}

fn is_empty(items: &&[String]) -> bool {
    items.is_empty()
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: String,
    code: i32,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'a str>,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    error: ErrorBody<'a>,
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    report: &HumanReport,
) -> Result<()> {
    if options.json {
        let envelope = SuccessEnvelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            notes: &report.notes,
            hints: &report.hints,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if !options.quiet {
        println!("{}", report.render());
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = error_hint(err);
    if json {
        let envelope = ErrorEnvelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
                hint: hint.as_deref(),
            },
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("try:   {hint}");
    }
    Ok(())
}

/// First positional argument, used to label error envelopes before clap
/// has parsed anything.
pub fn infer_command_name_from_args() -> String {
    std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with('-'))
        .unwrap_or_else(|| "dayplan".to_string())
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        exit_codes::INPUT_ERROR => "input_error",
        exit_codes::NOT_FOUND => "not_found",
        _ => "operation_failed",
    }
}

fn error_hint(err: &Error) -> Option<String> {
    match err {
        Error::InvalidDate(_) => Some("use a date like 2024-03-15".to_string()),
        Error::TaskNotFound { date, .. } => Some(format!("dayplan show {date}")),
        Error::Validation {
            field: "priority", ..
        } => Some("use --priority normal|important|urgent".to_string()),
        Error::InvalidConfig(_) => Some("fix dayplan.toml then retry".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_aligned() {
        let mut report = HumanReport::new("Stats 2024-03");
        report.field("Tasks", "4");
        report.field("Days with records", "2");

        assert_eq!(
            report.render(),
            "Stats 2024-03\n\n  Tasks              4\n  Days with records  2"
        );
    }

    #[test]
    fn notes_and_hints_follow_lines() {
        let mut report = HumanReport::new("Day 2024-03-15");
        report.line("[ ] 1 (normal) Buy milk");
        report.note("carried 1 unfinished task(s) from 2024-03-14");
        report.hint("dayplan done 2024-03-15 1");

        let text = report.render();
        assert!(text.ends_with(
            "  [ ] 1 (normal) Buy milk\n\nnote: carried 1 unfinished task(s) from 2024-03-14\ntry:  dayplan done 2024-03-15 1"
        ));
    }

    #[test]
    fn error_kinds_follow_exit_codes() {
        assert_eq!(error_kind(&Error::InvalidDate("x".into())), "input_error");
        assert_eq!(
            error_kind(&Error::TaskNotFound {
                date: "2024-03-15".into(),
                id: "1".into()
            }),
            "not_found"
        );
        assert_eq!(
            error_kind(&Error::OperationFailed("x".into())),
            "operation_failed"
        );
    }

    #[test]
    fn not_found_hint_points_at_the_day() {
        let err = Error::TaskNotFound {
            date: "2024-03-15".into(),
            id: "1".into(),
        };
        assert_eq!(error_hint(&err).as_deref(), Some("dayplan show 2024-03-15"));
        assert!(error_hint(&Error::OperationFailed("x".into())).is_none());
    }
}
