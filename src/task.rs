//! Task data structure and related functionality.
//!
//! This module defines the `Task` struct that represents a single to-do item,
//! the `TaskId` token that identifies it, and the `Draft` of field values a
//! form collects before a task is committed.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::due::{normalise_due_input, parse_stored_due};
use crate::fields::*;

/// Unique token identifying a task.
///
/// New ids are UUID v7 strings (millisecond timestamp plus random bits).
/// Persisted data written by the browser widget carries numeric ids; those
/// deserialise into their decimal string form. A missing or `null` id
/// deserialises to the empty token, which the store replaces on open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<RawId>")]
pub struct TaskId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<Option<RawId>> for TaskId {
    fn from(raw: Option<RawId>) -> Self {
        match raw {
            Some(RawId::Text(s)) => TaskId(s),
            Some(RawId::Number(n)) => TaskId(n.to_string()),
            None => TaskId::default(),
        }
    }
}

impl TaskId {
    /// Generate a fresh id from the current time and a random component.
    pub fn generate() -> Self {
        TaskId(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the placeholder carried by tasks persisted without an id.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// A single to-do item.
///
/// Field names on disk match the browser widget's local storage layout
/// (`dueDate` in camel case), so exported widget data loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: TaskId,
    pub text: String,
    pub category: Category,
    pub priority: Priority,
    /// ISO `YYYY-MM-DD` when set through a draft; empty when absent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub due_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Task {
    /// Build an uncompleted task from a draft. Returns `None` when the
    /// draft's text is empty after trimming.
    pub fn from_draft(draft: &Draft, id: TaskId) -> Option<Self> {
        let text = draft.text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Task {
            id,
            text: text.to_string(),
            category: draft.category,
            priority: draft.priority,
            due_date: normalise_due_input(&draft.due_date, Local::now().date_naive()),
            completed: false,
        })
    }

    /// The due date as a calendar date, if it is set and valid.
    pub fn due(&self) -> Option<NaiveDate> {
        parse_stored_due(&self.due_date)
    }
}

/// Uncommitted field values collected by a form before submit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Draft {
    pub text: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: String,
}

impl Draft {
    pub fn new(text: impl Into<String>) -> Self {
        Draft {
            text: text.into(),
            ..Draft::default()
        }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = due_date.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_distinct_and_non_empty() {
        let a = TaskId::generate();
        let b = TaskId::generate();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_draft_trims_and_rejects_blank() {
        let task = Task::from_draft(&Draft::new("  Buy milk  "), TaskId::from("x")).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.category, Category::Work);
        assert_eq!(task.priority, Priority::Medium);

        assert!(Task::from_draft(&Draft::new(" \t "), TaskId::from("y")).is_none());
    }

    #[test]
    fn test_deserialises_widget_layout() {
        let json = r#"[
            {"text":"a","category":"Work","priority":"High","dueDate":"2024-05-01","completed":true,"id":1712345678901.25},
            {"text":"b","category":"Urgent","priority":"Low","dueDate":"","completed":false}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks[0].id.as_str(), "1712345678901.25");
        assert_eq!(tasks[0].due(), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(tasks[1].id.is_empty());
        assert_eq!(tasks[1].due(), None);
    }

    #[test]
    fn test_null_due_date_and_completed_read_as_absent() {
        let json = r#"[{"id":"a","text":"a","category":"Work","priority":"High","dueDate":null,"completed":null}]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks[0].due_date, "");
        assert!(!tasks[0].completed);
    }

    #[test]
    fn test_serialises_camel_case_with_string_id() {
        let task = Task::from_draft(&Draft::new("x").due_date("2030-01-02"), TaskId::from("abc")).unwrap();
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["dueDate"], "2030-01-02");
        assert_eq!(value["completed"], false);
    }
}
