//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant:
//!
//! | Module        | Commands handled |
//! |---------------|------------------|
//! | `breakdown`   | `Breakdown`      |
//! | `launch`      | `Launch`         |
//! | `interactive` | `Interactive`    |
//! | `repo`        | `RepoName`       |
//! | `config`      | `Config`         |

pub mod breakdown;
pub mod config;
pub mod interactive;
pub mod launch;
pub mod repo;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use gitagu::api::HttpBackend;
use gitagu::board::SessionBoard;
use gitagu::config::Settings;

use super::{Cli, SessionArgs};

pub use breakdown::cmd_breakdown;
pub use config::cmd_config;
pub use interactive::cmd_interactive;
pub use launch::{TaskSource, cmd_launch};
pub use repo::cmd_repo_name;

/// Resolve settings from every layer, surfacing config warnings in the log.
fn load_settings(cli: &Cli, session: Option<&SessionArgs>) -> Result<Settings> {
    let settings = Settings::resolve(cli.config.as_deref(), &cli.overrides(session))?;
    for warning in settings.config.validate() {
        warn!("{}", warning);
    }
    Ok(settings)
}

/// A board wired to the HTTP backend with the form prefilled from settings.
fn open_board(cli: &Cli, session: Option<&SessionArgs>) -> Result<SessionBoard> {
    let settings = load_settings(cli, session)?;
    let backend = HttpBackend::new(&settings.config.api.base_url, settings.config.timeout())
        .context("Failed to set up the backend client")?;
    debug!(base_url = backend.base_url(), "backend client ready");
    Ok(SessionBoard::new(Arc::new(backend)).with_form(settings.form()))
}
