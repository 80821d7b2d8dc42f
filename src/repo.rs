//! Repository reference parsing.

use regex::Regex;
use std::sync::LazyLock;

// Host must start the string or follow a scheme/credential/subdomain separator.
static GITHUB_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[/@.])github\.com[/:]([^/\s?#:]+)/([^/\s?#]+)").unwrap()
});

static OWNER_REPO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^/\s]+/[^/\s]+$").unwrap());

/// Normalize a repository reference to `owner/repo`.
///
/// Accepts GitHub URLs in any of the common shapes and bare `owner/repo`
/// strings:
/// - `https://github.com/owner/repo`
/// - `https://github.com/owner/repo.git`
/// - `https://github.com/owner/repo/tree/main?tab=readme#top`
/// - `git@github.com:owner/repo.git`
/// - `owner/repo`
///
/// Returns an empty string when nothing usable is found. This is a purely
/// syntactic check; the repository is never looked up.
pub fn extract_repo_name(input: &str) -> String {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    if trimmed.is_empty() {
        return String::new();
    }

    if let Some(caps) = GITHUB_URL_REGEX.captures(trimmed) {
        let owner = &caps[1];
        let repo = caps[2].strip_suffix(".git").unwrap_or(&caps[2]);
        if !owner.is_empty() && !repo.is_empty() {
            return format!("{}/{}", owner, repo);
        }
    }

    if OWNER_REPO_REGEX.is_match(trimmed) {
        return trimmed.to_string();
    }

    String::new()
}

/// Canonical browser URL for an `owner/repo` slug.
pub fn github_url(owner_repo: &str) -> String {
    format!("https://github.com/{}", owner_repo)
}
