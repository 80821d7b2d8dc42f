//! Task entity and its status lifecycle.
//!
//! A task moves `pending → creating → created | error`, and may go back from
//! `error` to `creating` when the user retries. Every other move is rejected.

use serde::{Deserialize, Serialize};

use crate::errors::TaskError;

/// Identifier unique within the board's lifetime.
///
/// Generated per batch as `"{millis}-{index}"`, so ids from one breakdown or
/// one manual processing run never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    /// Ids for a batch of `count` tasks created at `millis`.
    pub fn batch(millis: i64, count: usize) -> Vec<TaskId> {
        (0..count)
            .map(|index| TaskId(format!("{}-{}", millis, index)))
            .collect()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Creating,
    Created,
    Error,
}

impl TaskStatus {
    /// Whether session creation may be started from this status.
    pub fn can_start_creation(self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Error)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Creating => write!(f, "creating"),
            TaskStatus::Created => write!(f, "created"),
            TaskStatus::Error => write!(f, "error"),
        }
    }
}

/// A title/description pair before it becomes a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Task {
    pub fn pending(id: TaskId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            status: TaskStatus::Pending,
            session_id: None,
            session_url: None,
            error: None,
        }
    }

    /// Materialize descriptors as pending tasks, one id per position.
    pub fn from_descriptors(millis: i64, descriptors: Vec<TaskDescriptor>) -> Vec<Task> {
        let ids = TaskId::batch(millis, descriptors.len());
        ids.into_iter()
            .zip(descriptors)
            .map(|(id, d)| Task::pending(id, d.title, d.description))
            .collect()
    }

    /// `pending | error → creating`. Clears a previous error message.
    pub fn begin_creating(&mut self) -> Result<(), TaskError> {
        if !self.status.can_start_creation() {
            return Err(self.invalid(TaskStatus::Creating));
        }
        self.status = TaskStatus::Creating;
        self.error = None;
        Ok(())
    }

    /// `creating → created`.
    pub fn mark_created(
        &mut self,
        session_id: impl Into<String>,
        session_url: impl Into<String>,
    ) -> Result<(), TaskError> {
        if self.status != TaskStatus::Creating {
            return Err(self.invalid(TaskStatus::Created));
        }
        self.status = TaskStatus::Created;
        self.session_id = Some(session_id.into());
        self.session_url = Some(session_url.into());
        self.error = None;
        Ok(())
    }

    /// `creating → error`.
    pub fn mark_failed(&mut self, message: impl Into<String>) -> Result<(), TaskError> {
        if self.status != TaskStatus::Creating {
            return Err(self.invalid(TaskStatus::Error));
        }
        self.status = TaskStatus::Error;
        self.error = Some(message.into());
        Ok(())
    }

    fn invalid(&self, to: TaskStatus) -> TaskError {
        TaskError::InvalidTransition {
            from: self.status,
            to,
        }
    }
}

/// Title for a manually written task: the first six words of its
/// description, with `...` when the description is longer.
pub fn title_from_description(description: &str, index: usize) -> String {
    const TITLE_WORDS: usize = 6;

    let words: Vec<&str> = description.split_whitespace().collect();
    let mut title = words
        .iter()
        .take(TITLE_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > TITLE_WORDS {
        title.push_str("...");
    }
    if title.is_empty() {
        format!("Task {}", index + 1)
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task::pending(TaskId::from("1-0"), "Fix login", "The login button is broken")
    }

    #[test]
    fn test_batch_ids_are_distinct_and_ordered() {
        let ids = TaskId::batch(1_700_000_000_000, 3);
        assert_eq!(
            ids,
            vec![
                TaskId::from("1700000000000-0"),
                TaskId::from("1700000000000-1"),
                TaskId::from("1700000000000-2"),
            ]
        );
    }

    #[test]
    fn test_from_descriptors_preserves_order() {
        let tasks = Task::from_descriptors(
            42,
            vec![
                TaskDescriptor {
                    title: "A".into(),
                    description: "first".into(),
                },
                TaskDescriptor {
                    title: "B".into(),
                    description: "second".into(),
                },
            ],
        );
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "A");
        assert_eq!(tasks[1].title, "B");
        assert!(tasks.iter().all(|t| t.status == TaskStatus::Pending));
        assert_ne!(tasks[0].id, tasks[1].id);
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut t = task();
        t.begin_creating().unwrap();
        assert_eq!(t.status, TaskStatus::Creating);
        t.mark_created("sess-1", "https://app.devin.ai/sessions/sess-1").unwrap();
        assert_eq!(t.status, TaskStatus::Created);
        assert_eq!(t.session_id.as_deref(), Some("sess-1"));
        assert!(t.session_url.is_some());
    }

    #[test]
    fn test_retry_from_error_clears_message() {
        let mut t = task();
        t.begin_creating().unwrap();
        t.mark_failed("Devin API unreachable").unwrap();
        assert_eq!(t.status, TaskStatus::Error);
        assert_eq!(t.error.as_deref(), Some("Devin API unreachable"));

        t.begin_creating().unwrap();
        assert_eq!(t.status, TaskStatus::Creating);
        assert!(t.error.is_none());
    }

    #[test]
    fn test_created_task_cannot_be_recreated() {
        let mut t = task();
        t.begin_creating().unwrap();
        t.mark_created("s", "u").unwrap();
        let err = t.begin_creating().unwrap_err();
        assert_eq!(
            err,
            TaskError::InvalidTransition {
                from: TaskStatus::Created,
                to: TaskStatus::Creating
            }
        );
        assert_eq!(t.status, TaskStatus::Created);
    }

    #[test]
    fn test_creating_twice_is_rejected() {
        let mut t = task();
        t.begin_creating().unwrap();
        assert!(t.begin_creating().is_err());
    }

    #[test]
    fn test_pending_cannot_jump_to_outcome() {
        let mut t = task();
        assert!(t.mark_created("s", "u").is_err());
        assert!(t.mark_failed("boom").is_err());
        assert_eq!(t.status, TaskStatus::Pending);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&TaskStatus::Creating).unwrap();
        assert_eq!(json, "\"creating\"");
    }

    #[test]
    fn test_task_json_omits_empty_session_fields() {
        let json = serde_json::to_value(task()).unwrap();
        assert_eq!(json["id"], "1-0");
        assert!(json.get("session_id").is_none());
        assert!(json.get("error").is_none());
    }

    // ── title_from_description ───────────────────────────────────────

    #[test]
    fn test_short_description_is_the_title() {
        assert_eq!(title_from_description("fix the bug", 0), "fix the bug");
    }

    #[test]
    fn test_long_description_is_truncated_with_ellipsis() {
        assert_eq!(
            title_from_description("add a retry button to the failed task card", 0),
            "add a retry button to the..."
        );
    }

    #[test]
    fn test_exactly_six_words_has_no_ellipsis() {
        assert_eq!(title_from_description("one two three four five six", 0), "one two three four five six");
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(title_from_description("  fix\n\tthe   bug ", 0), "fix the bug");
    }

    #[test]
    fn test_blank_description_falls_back_to_index() {
        assert_eq!(title_from_description("   ", 2), "Task 3");
    }
}
