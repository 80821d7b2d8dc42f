//! `gitagu breakdown`: print the tasks the backend proposes for a request.

use anyhow::{Result, bail};

use gitagu::board::BoardNotice;
use gitagu::form::Tab;
use gitagu::ui::{LaunchProgress, render_tasks};

use super::super::Cli;
use super::open_board;

pub async fn cmd_breakdown(cli: &Cli, request: &str, json: bool) -> Result<()> {
    let mut board = open_board(cli, None)?;
    board.set_request_text(request);
    board.start_breakdown()?;

    let spinner = LaunchProgress::breakdown_spinner();
    let notices = board.settle().await;
    spinner.finish_and_clear();

    for notice in notices {
        if let BoardNotice::Alert(message) = notice {
            bail!(message);
        }
    }

    let tasks = board.tasks(Tab::Auto);
    if json {
        println!("{}", serde_json::to_string_pretty(tasks)?);
    } else if tasks.is_empty() {
        println!("The backend proposed no tasks.");
    } else {
        println!("{}", render_tasks(tasks));
    }
    board.close();
    Ok(())
}
