//! Typed error hierarchy for gitagu.
//!
//! - `ValidationError` — input rejected before any network call
//! - `ApiError` — backend transport, status and decoding failures
//! - `TaskError` / `DraftError` — illegal edits of the task and draft lists
//! - `BoardError` — anything a `SessionBoard` operation can return

use thiserror::Error;

use crate::task::TaskStatus;

/// Input rejected before any request is issued. No state is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a request to break down")]
    EmptyRequest,

    #[error("Please enter your Devin API key")]
    MissingApiKey,

    #[error("Please enter at least one task description")]
    NoManualTasks,

    #[error("A task breakdown is already in progress")]
    BreakdownInFlight,
}

/// Failures talking to the gitagu backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Invalid backend URL '{0}'")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// Text shown next to a failed task or in a breakdown alert.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport { source, .. } if source.is_timeout() => {
                "Request timed out".to_string()
            }
            ApiError::Transport { source, .. } if source.is_connect() => {
                "Could not connect to the backend".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Illegal operations on a single task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Task cannot move from {from} to {to}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },

    #[error("Task {0} not found")]
    NotFound(String),
}

/// Illegal edits of the manual draft list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("At least {floor} drafts must remain")]
    AtFloor { floor: usize },

    #[error("Draft {0} not found")]
    NotFound(String),
}

/// Errors returned by `SessionBoard` operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Task(#[from] TaskError),

    #[error(transparent)]
    Draft(#[from] DraftError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_messages_are_user_facing() {
        assert_eq!(
            ValidationError::MissingApiKey.to_string(),
            "Please enter your Devin API key"
        );
        assert!(ValidationError::EmptyRequest.to_string().contains("request"));
    }

    #[test]
    fn api_status_error_user_message_is_the_detail() {
        let err = ApiError::Status {
            status: 503,
            message: "Devin API unreachable".to_string(),
        };
        assert_eq!(err.user_message(), "Devin API unreachable");
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn api_decode_error_carries_endpoint() {
        let err = ApiError::Decode {
            endpoint: "/api/breakdown-tasks".to_string(),
            message: "missing field `tasks`".to_string(),
        };
        match &err {
            ApiError::Decode { endpoint, .. } => assert_eq!(endpoint, "/api/breakdown-tasks"),
            _ => panic!("Expected Decode"),
        }
        assert!(err.user_message().contains("missing field"));
    }

    #[test]
    fn task_error_invalid_transition_names_both_states() {
        let err = TaskError::InvalidTransition {
            from: TaskStatus::Created,
            to: TaskStatus::Creating,
        };
        let msg = err.to_string();
        assert!(msg.contains("created"));
        assert!(msg.contains("creating"));
    }

    #[test]
    fn board_error_converts_from_each_source() {
        let from_validation: BoardError = ValidationError::NoManualTasks.into();
        assert!(matches!(
            from_validation,
            BoardError::Validation(ValidationError::NoManualTasks)
        ));

        let from_draft: BoardError = DraftError::AtFloor { floor: 5 }.into();
        assert!(matches!(from_draft, BoardError::Draft(DraftError::AtFloor { floor: 5 })));

        let from_task: BoardError = TaskError::NotFound("t-1".into()).into();
        assert_eq!(from_task.to_string(), "Task t-1 not found");
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&ValidationError::EmptyRequest);
        assert_std_error(&ApiError::InvalidBaseUrl("x".into()));
        assert_std_error(&TaskError::NotFound("x".into()));
        assert_std_error(&DraftError::NotFound("x".into()));
        assert_std_error(&BoardError::Validation(ValidationError::EmptyRequest));
    }
}
