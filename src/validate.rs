//! Admission checks for task payloads.
//!
//! Drafts are checked in full. Patches are checked field by field: only
//! what the caller sent is validated, the merged task is not rebuilt first.

use crate::error::{Error, Result};
use crate::record::{Priority, TaskDraft, TaskPatch};

/// Default upper bound on task content, in characters.
pub const MAX_CONTENT_LEN: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct TaskValidator {
    max_content_len: usize,
}

impl Default for TaskValidator {
    fn default() -> Self {
        Self::new(MAX_CONTENT_LEN)
    }
}

impl TaskValidator {
    pub fn new(max_content_len: usize) -> Self {
        Self { max_content_len }
    }

    pub fn validate_draft(&self, draft: &TaskDraft) -> Result<()> {
        self.validate_content(&draft.content)?;
        if let Some(priority) = draft.priority.as_deref() {
            parse_priority(priority)?;
        }
        Ok(())
    }

    pub fn validate_patch(&self, patch: &TaskPatch) -> Result<()> {
        if let Some(content) = patch.content.as_deref() {
            self.validate_content(content)?;
        }
        if let Some(priority) = patch.priority.as_deref() {
            parse_priority(priority)?;
        }
        Ok(())
    }

    pub fn validate_content(&self, content: &str) -> Result<()> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("content", "content cannot be empty"));
        }
        let len = trimmed.chars().count();
        if len > self.max_content_len {
            return Err(Error::validation(
                "content",
                format!(
                    "content is {len} characters (max {})",
                    self.max_content_len
                ),
            ));
        }
        Ok(())
    }
}

/// Exact, case-sensitive priority match.
pub fn parse_priority(value: &str) -> Result<Priority> {
    value.parse()
}
