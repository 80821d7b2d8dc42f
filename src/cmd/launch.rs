//! `gitagu launch`: produce tasks from one tab and create a session for each.

use anyhow::{Result, bail};
use dialoguer::Confirm;

use gitagu::board::{BoardNotice, SessionBoard};
use gitagu::errors::ValidationError;
use gitagu::form::Tab;
use gitagu::ui::{LaunchProgress, render_tasks};

use super::super::{Cli, SessionArgs};
use super::open_board;

/// Where the tasks of a launch come from.
pub enum TaskSource {
    /// Broken down by the backend, auto tab.
    Request(String),
    /// Written by hand, manual tab.
    Manual(Vec<String>),
}

pub async fn cmd_launch(cli: &Cli, source: TaskSource, session: &SessionArgs, yes: bool) -> Result<()> {
    let mut board = open_board(cli, Some(session))?;
    // Checked up front so a missing key does not cost a breakdown call.
    if board.form().api_key.is_blank() {
        return Err(ValidationError::MissingApiKey.into());
    }

    match source {
        TaskSource::Request(text) => breakdown_into_tasks(&mut board, &text).await?,
        TaskSource::Manual(descriptions) => fill_manual_tasks(&mut board, descriptions)?,
    }

    let tasks = board.active_tasks();
    if tasks.is_empty() {
        println!("No tasks to launch.");
        return Ok(());
    }
    println!("{}", render_tasks(tasks));
    println!();

    if !yes {
        let confirm = Confirm::new()
            .with_prompt(format!("Create {} Devin sessions?", tasks.len()))
            .default(true)
            .interact()
            .unwrap_or(false);

        if !confirm {
            println!("Launch cancelled");
            return Ok(());
        }
    }

    let started = board.create_all_sessions()?;
    let mut progress = LaunchProgress::new(started as u64);
    progress.start();
    while let Some(notice) = board.next_notice().await {
        let title = notice_title(&board, &notice);
        progress.record(&notice, &title);
    }
    progress.finish();

    println!();
    println!("{}", render_tasks(board.active_tasks()));
    let failed = progress.failed();
    board.close();

    if failed > 0 {
        bail!("{} of {} sessions failed", failed, started);
    }
    Ok(())
}

async fn breakdown_into_tasks(board: &mut SessionBoard, request: &str) -> Result<()> {
    board.set_active_tab(Tab::Auto);
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
    Ok(())
}

fn fill_manual_tasks(board: &mut SessionBoard, descriptions: Vec<String>) -> Result<()> {
    board.set_active_tab(Tab::Manual);
    while board.drafts().len() < descriptions.len() {
        board.add_drafts();
    }
    let ids: Vec<String> = board
        .drafts()
        .drafts()
        .iter()
        .map(|d| d.id.clone())
        .collect();
    for (id, description) in ids.iter().zip(descriptions) {
        board.edit_draft(id, description)?;
    }
    board.process_manual_tasks()?;
    Ok(())
}

fn notice_title(board: &SessionBoard, notice: &BoardNotice) -> String {
    match notice {
        BoardNotice::SessionCreated { tab, task_id, .. }
        | BoardNotice::SessionFailed { tab, task_id, .. } => board
            .task(*tab, task_id)
            .map(|t| t.title.clone())
            .unwrap_or_else(|| task_id.to_string()),
        _ => String::new(),
    }
}
