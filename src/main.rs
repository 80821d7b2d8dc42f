use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use gitagu::config::{API_KEY_ENV, CliOverrides};
use gitagu::form::Tab;

mod cmd;

#[derive(Parser)]
#[command(name = "gitagu")]
#[command(version, about = "Break engineering requests into tasks and launch a Devin session per task")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base URL of the gitagu backend (overrides GITAGU_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to gitagu.toml. Defaults to the user config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Devin API key, sent with every session request
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn overrides(&self, session: Option<&SessionArgs>) -> CliOverrides {
        CliOverrides {
            api_url: self.api_url.clone(),
            api_key: self.api_key.clone(),
            repo_url: session.and_then(|s| s.repo.clone()),
            snapshot_id: session.and_then(|s| s.snapshot.clone()),
            playbook_id: session.and_then(|s| s.playbook.clone()),
        }
    }
}

/// Session parameters shared by every task of a launch.
#[derive(Args, Clone, Default)]
pub struct SessionArgs {
    /// GitHub repository the sessions should work in (URL or owner/repo)
    #[arg(long)]
    pub repo: Option<String>,

    /// Devin snapshot to start each session from
    #[arg(long)]
    pub snapshot: Option<String>,

    /// Devin playbook to attach to each session
    #[arg(long)]
    pub playbook: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask the backend to break a request into tasks and print them
    Breakdown {
        request: String,

        /// Print the tasks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Produce tasks and create a Devin session for each of them
    Launch {
        /// Request to break down into tasks
        #[arg(long, conflicts_with = "tasks", required_unless_present = "tasks")]
        request: Option<String>,

        /// A task description written by hand (repeatable)
        #[arg(long = "task", value_name = "TEXT")]
        tasks: Vec<String>,

        #[command(flatten)]
        session: SessionArgs,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Menu-driven session board
    Interactive {
        #[command(flatten)]
        session: SessionArgs,

        /// Tab to open on: auto or manual
        #[arg(long, default_value = "auto")]
        tab: Tab,
    },
    /// Print the owner/repo named by a GitHub URL or reference
    RepoName { input: String },
    /// View, validate or create the configuration file
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default gitagu.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so a DEVIN_API_KEY in .env reaches clap.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    gitagu::logging::init(cli.verbose);

    match &cli.command {
        Commands::Breakdown { request, json } => {
            cmd::cmd_breakdown(&cli, request, *json).await?;
        }
        Commands::Launch {
            request,
            tasks,
            session,
            yes,
        } => {
            let source = match request {
                Some(text) => cmd::TaskSource::Request(text.clone()),
                None => cmd::TaskSource::Manual(tasks.clone()),
            };
            cmd::cmd_launch(&cli, source, session, *yes).await?;
        }
        Commands::Interactive { session, tab } => {
            cmd::cmd_interactive(&cli, session, *tab).await?
        }
        Commands::RepoName { input } => cmd::cmd_repo_name(input)?,
        Commands::Config { command } => cmd::cmd_config(&cli, command.clone())?,
    }

    Ok(())
}
