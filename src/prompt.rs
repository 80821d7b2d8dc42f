//! Prompt and request composition for session creation.

use crate::api::CreateSessionRequest;
use crate::form::FormConfig;
use crate::repo::{extract_repo_name, github_url};
use crate::task::Task;

/// Build the prompt sent to Devin for one task.
///
/// When `repo_url` resolves to an `owner/repo`, the prompt names the
/// repository first; otherwise it is just the title and description.
pub fn compose_prompt(title: &str, description: &str, repo_url: &str) -> String {
    let owner_repo = extract_repo_name(repo_url);
    if owner_repo.is_empty() {
        format!("{}\n\n{}", title, description)
    } else {
        format!(
            "Using repo {}, do this task - {}\n\n{}",
            github_url(&owner_repo),
            title,
            description
        )
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Request payload for `task`. Blank snapshot/playbook ids are left out;
/// the API key is sent exactly as entered.
pub fn session_request(task: &Task, form: &FormConfig) -> CreateSessionRequest {
    CreateSessionRequest {
        api_key: form.api_key.expose().to_string(),
        prompt: compose_prompt(&task.title, &task.description, &form.repo_url),
        snapshot_id: non_blank(&form.snapshot_id),
        playbook_id: non_blank(&form.playbook_id),
    }
}
