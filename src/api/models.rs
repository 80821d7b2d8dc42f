use serde::{Deserialize, Serialize};

use crate::task::TaskDescriptor;

/// Body of `POST /api/breakdown-tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownRequest {
    pub request: String,
}

/// Response of `POST /api/breakdown-tasks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownResponse {
    pub tasks: Vec<TaskDescriptor>,
}

/// Body of `POST /api/create-devin-session`.
///
/// `snapshot_id` and `playbook_id` are left out of the JSON when `None`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub api_key: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playbook_id: Option<String>,
}

impl std::fmt::Debug for CreateSessionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateSessionRequest")
            .field("api_key", &"<redacted>")
            .field("prompt", &self.prompt)
            .field("snapshot_id", &self.snapshot_id)
            .field("playbook_id", &self.playbook_id)
            .finish()
    }
}

/// Response of `POST /api/create-devin-session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedSession {
    pub session_id: String,
    pub session_url: String,
}
