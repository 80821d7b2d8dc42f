use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::models::{BreakdownRequest, BreakdownResponse, CreateSessionRequest, CreatedSession};
use crate::errors::ApiError;
use crate::task::TaskDescriptor;

pub const BREAKDOWN_PATH: &str = "/api/breakdown-tasks";
pub const CREATE_SESSION_PATH: &str = "/api/create-devin-session";

/// Longest raw body echoed back as an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Operations the session board needs from the backend.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Split a free-text request into task descriptors, in backend order.
    async fn breakdown_tasks(&self, request: &str) -> Result<Vec<TaskDescriptor>, ApiError>;

    /// Start a new Devin session. Every call creates a new remote session.
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreatedSession, ApiError>;
}

/// `reqwest` implementation of [`BackendClient`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client for `base_url`. Without `timeout`, requests wait as long
    /// as the transport does.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidBaseUrl(base_url));
        }
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("gitagu/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| ApiError::Transport {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "POST");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            let message = error_message(&status.to_string(), &text);
            warn!(%url, status = status.as_u16(), %message, "backend returned error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl BackendClient for HttpBackend {
    async fn breakdown_tasks(&self, request: &str) -> Result<Vec<TaskDescriptor>, ApiError> {
        let body = BreakdownRequest {
            request: request.trim().to_string(),
        };
        let resp: BreakdownResponse = self.post_json(BREAKDOWN_PATH, &body).await?;
        info!(count = resp.tasks.len(), "task breakdown received");
        Ok(resp.tasks)
    }

    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreatedSession, ApiError> {
        let session: CreatedSession = self.post_json(CREATE_SESSION_PATH, request).await?;
        info!(session_id = %session.session_id, "devin session created");
        Ok(session)
    }
}

/// Human-readable message for a failed response.
///
/// Looks for a FastAPI style `detail` (string, or list of `{msg}` entries),
/// then `error` / `message` fields. A JSON object with none of those yields
/// the status line; any other body is echoed back, trimmed and truncated.
pub fn error_message(status_line: &str, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => return s.clone(),
            Some(serde_json::Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !msgs.is_empty() {
                    return msgs.join("; ");
                }
            }
            _ => {}
        }
        for key in ["error", "message"] {
            if let Some(s) = value.get(key).and_then(|v| v.as_str()) {
                if !s.trim().is_empty() {
                    return s.to_string();
                }
            }
        }
        // Structured body without a usable message field.
        if value.is_object() {
            return format!("HTTP {}", status_line);
        }
    }

    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status_line)
    } else {
        body.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}
