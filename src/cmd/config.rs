//! Configuration view and validation commands: `gitagu config`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use gitagu::config::{GitaguConfig, Settings};

use super::super::{Cli, ConfigCommands};

fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => GitaguConfig::default_path()
            .context("Could not determine the user config directory; pass --config"),
    }
}

fn timeout_label(secs: Option<u64>) -> String {
    match secs {
        Some(secs) if secs > 0 => secs.to_string(),
        _ => "(none)".to_string(),
    }
}

/// Settings with every layer applied, using the file only if it exists.
fn resolve(cli: &Cli, path: &Path) -> Result<Settings> {
    Settings::resolve(path.exists().then_some(path), &cli.overrides(None))
}

fn print_config(config: &GitaguConfig) {
    println!("[api]");
    println!("  base_url = \"{}\"", config.api.base_url);
    println!("  timeout_secs = {}", timeout_label(config.api.timeout_secs));
    println!();
    println!("[session]");
    println!("  repo_url = \"{}\"", config.session.repo_url);
    println!("  snapshot_id = \"{}\"", config.session.snapshot_id);
    println!("  playbook_id = \"{}\"", config.session.playbook_id);
    println!();
}

pub fn cmd_config(cli: &Cli, command: Option<ConfigCommands>) -> Result<()> {
    let path = config_path(cli)?;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("gitagu Configuration");
            println!("====================");
            println!();

            if path.exists() {
                println!("Config file: {}", path.display());
                println!();
                print_config(&GitaguConfig::load(&path)?);
            } else {
                println!("No gitagu.toml found at {}", path.display());
                println!("Run 'gitagu config init' to create one.");
                println!();
            }

            println!("Effective values (with env/CLI overrides):");
            let settings = resolve(cli, &path)?;
            match &settings.source {
                Some(source) => println!("  source = {}", source.display()),
                None => println!("  source = (defaults)"),
            }
            println!("  base_url = \"{}\"", settings.config.api.base_url);
            println!(
                "  timeout_secs = {}",
                timeout_label(settings.config.api.timeout_secs)
            );
            println!(
                "  api_key = {}",
                if settings.api_key.is_blank() { "(not set)" } else { "(set)" }
            );
            println!();
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !path.exists() {
                println!("No gitagu.toml found. Checking defaults with env/CLI overrides.");
                println!();
            }

            let warnings = resolve(cli, &path)?.config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init { force }) => {
            if path.exists() && !force {
                println!("gitagu.toml already exists at {}", path.display());
                println!("Pass --force to overwrite it.");
                return Ok(());
            }

            GitaguConfig::default().save(&path)?;

            println!("Created gitagu.toml at {}", path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] base_url, timeout_secs");
            println!("  - [session] repo_url, snapshot_id, playbook_id");
            println!();
            println!("The Devin API key is read from --api-key or DEVIN_API_KEY only.");
        }
    }

    Ok(())
}
