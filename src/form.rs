//! Form state shared by both tabs, the tab selector and dismissal triggers.

/// Devin API key. Never serialized; `Debug` output is redacted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            write!(f, "ApiKey(<empty>)")
        } else {
            write!(f, "ApiKey(<redacted>)")
        }
    }
}

/// Inputs shared read-only by both tab workflows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormConfig {
    pub api_key: ApiKey,
    pub repo_url: String,
    pub snapshot_id: String,
    pub playbook_id: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Tasks produced by the breakdown service.
    #[default]
    Auto,
    /// Tasks written by hand as drafts.
    Manual,
}

impl Tab {
    pub fn other(self) -> Tab {
        match self {
            Tab::Auto => Tab::Manual,
            Tab::Manual => Tab::Auto,
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tab::Auto => write!(f, "auto"),
            Tab::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for Tab {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Tab::Auto),
            "manual" => Ok(Tab::Manual),
            _ => anyhow::bail!("Invalid tab '{}'. Valid values: auto, manual", s),
        }
    }
}

/// Ways the user can ask to close the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    CloseButton,
    /// Click on the overlay. `inside_body` is true when the click started
    /// inside the dialog body and only bubbled up to the overlay.
    OverlayClick { inside_body: bool },
    EscapeKey,
}

impl Dismissal {
    pub fn closes(self) -> bool {
        match self {
            Dismissal::CloseButton | Dismissal::EscapeKey => true,
            Dismissal::OverlayClick { inside_body } => !inside_body,
        }
    }
}
