//! Configuration for gitagu.
//!
//! Settings are layered: config file, then environment, then CLI flags.
//! The file lives at `$XDG_CONFIG_HOME/gitagu/gitagu.toml` unless
//! `--config` points elsewhere.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//! timeout_secs = 600    # optional; unset means no client-side timeout
//!
//! [session]
//! repo_url = "https://github.com/owner/repo"
//! snapshot_id = "snap-123"
//! playbook_id = ""
//! ```
//!
//! The Devin API key is never read from or written to this file. It comes
//! from `--api-key` or `DEVIN_API_KEY` only.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::form::{ApiKey, FormConfig};
use crate::repo::extract_repo_name;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const BASE_URL_ENV: &str = "GITAGU_API_URL";
pub const API_KEY_ENV: &str = "DEVIN_API_KEY";
pub const CONFIG_FILE_NAME: &str = "gitagu.toml";

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds. Unset or 0 leaves requests unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Defaults for the session form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSection {
    #[serde(default)]
    pub repo_url: String,
    #[serde(default)]
    pub snapshot_id: String,
    #[serde(default)]
    pub playbook_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitaguConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub session: SessionSection,
}

/// Values given on the command line. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub repo_url: Option<String>,
    pub snapshot_id: Option<String>,
    pub playbook_id: Option<String>,
}

/// Fully layered settings used to build the backend client and the form.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: GitaguConfig,
    pub api_key: ApiKey,
    /// Where the file layer came from, if one was found.
    pub source: Option<PathBuf>,
}

impl GitaguConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse gitagu.toml")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize gitagu.toml")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file at {}", path.display()))
    }

    /// `$XDG_CONFIG_HOME/gitagu/gitagu.toml` (or the platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gitagu").join(CONFIG_FILE_NAME))
    }

    /// Client-side request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.api
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Human-readable problems that do not stop the config from loading.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(format!(
                "api.base_url '{}' should start with http:// or https://",
                url
            ));
        }
        if self.api.timeout_secs == Some(0) {
            warnings.push("api.timeout_secs is 0; requests will not time out".to_string());
        }
        let repo = self.session.repo_url.trim();
        if !repo.is_empty() && extract_repo_name(repo).is_empty() {
            warnings.push(format!(
                "session.repo_url '{}' is not a GitHub repository; prompts will not name a repo",
                repo
            ));
        }
        warnings
    }

    fn apply_env(&mut self, base_url_env: Option<String>) {
        if let Some(url) = base_url_env.filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url;
        }
    }

    fn apply_cli(&mut self, cli: &CliOverrides) {
        if let Some(url) = &cli.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(repo) = &cli.repo_url {
            self.session.repo_url = repo.clone();
        }
        if let Some(snapshot) = &cli.snapshot_id {
            self.session.snapshot_id = snapshot.clone();
        }
        if let Some(playbook) = &cli.playbook_id {
            self.session.playbook_id = playbook.clone();
        }
    }
}

impl Settings {
    /// Resolve file → environment → CLI.
    pub fn resolve(config_path: Option<&Path>, cli: &CliOverrides) -> Result<Self> {
        let (mut config, source) = match config_path {
            Some(path) => (GitaguConfig::load(path)?, Some(path.to_path_buf())),
            None => match GitaguConfig::default_path() {
                Some(path) if path.exists() => (GitaguConfig::load(&path)?, Some(path)),
                _ => (GitaguConfig::default(), None),
            },
        };
        config.apply_env(std::env::var(BASE_URL_ENV).ok());
        config.apply_cli(cli);
        config.api.base_url = config.api.base_url.trim().trim_end_matches('/').to_string();

        // clap already folds DEVIN_API_KEY into `cli.api_key`.
        let api_key = ApiKey::new(cli.api_key.clone().unwrap_or_default());

        Ok(Self {
            config,
            api_key,
            source,
        })
    }

    /// Initial form state for a new board.
    pub fn form(&self) -> FormConfig {
        FormConfig {
            api_key: self.api_key.clone(),
            repo_url: self.config.session.repo_url.clone(),
            snapshot_id: self.config.session.snapshot_id.clone(),
            playbook_id: self.config.session.playbook_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = GitaguConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.timeout(), None);
        assert!(config.session.repo_url.is_empty());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_parse_partial_file_fills_defaults() {
        let config = GitaguConfig::parse(
            r#"
            [session]
            repo_url = "https://github.com/acme/web"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.session.repo_url, "https://github.com/acme/web");
        assert!(config.session.snapshot_id.is_empty());
    }

    #[test]
    fn test_timeout_only_when_positive() {
        let zero = GitaguConfig::parse("[api]\ntimeout_secs = 0\n").unwrap();
        assert_eq!(zero.timeout(), None);

        let set = GitaguConfig::parse("[api]\ntimeout_secs = 90\n").unwrap();
        assert_eq!(set.timeout(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_default_config_omits_timeout_when_saved() {
        let raw = toml::to_string_pretty(&GitaguConfig::default()).unwrap();
        assert!(!raw.contains("timeout_secs"));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = GitaguConfig::parse("[api\nbase_url = 1").unwrap_err();
        assert!(err.to_string().contains("Failed to parse gitagu.toml"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let mut config = GitaguConfig::default();
        config.api.timeout_secs = Some(5);
        config.session.playbook_id = "play-1".to_string();
        config.save(&path).unwrap();

        let loaded = GitaguConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("api_key"));
    }

    #[test]
    fn test_validate_warnings() {
        let mut config = GitaguConfig::default();
        config.api.base_url = "localhost:8000".to_string();
        config.api.timeout_secs = Some(0);
        config.session.repo_url = "not a repo".to_string();
        let warnings = config.validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("base_url"));
        assert!(warnings[2].contains("repo_url"));
    }

    #[test]
    fn test_env_then_cli_layering() {
        let mut config = GitaguConfig::default();
        config.apply_env(Some("http://env:9000".to_string()));
        assert_eq!(config.api.base_url, "http://env:9000");

        config.apply_env(Some("   ".to_string()));
        assert_eq!(config.api.base_url, "http://env:9000");

        config.apply_cli(&CliOverrides {
            api_url: Some("http://cli:7000".to_string()),
            repo_url: Some("acme/web".to_string()),
            ..CliOverrides::default()
        });
        assert_eq!(config.api.base_url, "http://cli:7000");
        assert_eq!(config.session.repo_url, "acme/web");
        assert!(config.session.snapshot_id.is_empty());
    }

    #[test]
    fn test_resolve_with_explicit_file_and_form() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://file:8000/\"\n\n[session]\nsnapshot_id = \"snap-9\"\n",
        )
        .unwrap();

        let settings = Settings::resolve(
            Some(&path),
            &CliOverrides {
                api_url: Some("http://cli:1234/".to_string()),
                api_key: Some("key".to_string()),
                ..CliOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(settings.source.as_deref(), Some(path.as_path()));
        assert_eq!(settings.config.api.base_url, "http://cli:1234");
        let form = settings.form();
        assert_eq!(form.api_key.expose(), "key");
        assert_eq!(form.snapshot_id, "snap-9");
    }

    #[test]
    fn test_resolve_missing_explicit_file_errors() {
        let dir = tempdir().unwrap();
        let err = Settings::resolve(Some(&dir.path().join("nope.toml")), &CliOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
