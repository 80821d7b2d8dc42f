//! `gitagu interactive`: the session board as a terminal menu.
//!
//! Every board operation is a menu entry. Work started from the menu keeps
//! running while the menu is open; finished results are applied and shown
//! each time the board is redrawn.

use anyhow::Result;
use console::style;
use dialoguer::{Input, Password, Select, theme::ColorfulTheme};

use gitagu::board::{BoardNotice, SessionBoard};
use gitagu::errors::BoardError;
use gitagu::form::{Dismissal, Tab};
use gitagu::task::TaskId;
use gitagu::ui::icons::{CHECK, CROSS, SPARKLE, WARNING};
use gitagu::ui::{LaunchProgress, render_board};

use super::super::{Cli, SessionArgs};
use super::open_board;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    SwitchTab,
    EditRequest,
    BreakDown,
    EditDraft,
    AddDrafts,
    RemoveDraft,
    ProcessDrafts,
    CreateSession,
    CreateAll,
    WaitForResults,
    EditSettings,
    ResetTab,
    ResetAll,
    Close,
}

impl Action {
    fn label(self, board: &SessionBoard) -> String {
        match self {
            Action::SwitchTab => format!("Switch to {} tab", board.active_tab().other()),
            Action::EditRequest => "Edit request".to_string(),
            Action::BreakDown => "Break down request into tasks".to_string(),
            Action::EditDraft => "Edit a draft".to_string(),
            Action::AddDrafts => "Add more drafts".to_string(),
            Action::RemoveDraft => "Remove a draft".to_string(),
            Action::ProcessDrafts => "Process drafts into tasks".to_string(),
            Action::CreateSession => "Create session for a task (or retry)".to_string(),
            Action::CreateAll => "Create sessions for all tasks".to_string(),
            Action::WaitForResults => format!("Wait for results ({} in flight)", board.in_flight()),
            Action::EditSettings => "Edit API key, repository, snapshot, playbook".to_string(),
            Action::ResetTab => format!("Reset {} tab", board.active_tab()),
            Action::ResetAll => "Reset everything".to_string(),
            Action::Close => "Close".to_string(),
        }
    }
}

fn actions_for(tab: Tab) -> Vec<Action> {
    let mut actions = vec![Action::SwitchTab];
    match tab {
        Tab::Auto => actions.extend([Action::EditRequest, Action::BreakDown]),
        Tab::Manual => actions.extend([
            Action::EditDraft,
            Action::AddDrafts,
            Action::RemoveDraft,
            Action::ProcessDrafts,
        ]),
    }
    actions.extend([
        Action::CreateSession,
        Action::CreateAll,
        Action::WaitForResults,
        Action::EditSettings,
        Action::ResetTab,
        Action::ResetAll,
        Action::Close,
    ]);
    actions
}

pub async fn cmd_interactive(cli: &Cli, session: &SessionArgs, tab: Tab) -> Result<()> {
    let mut board = open_board(cli, Some(session))?;
    board.set_active_tab(tab);
    let theme = ColorfulTheme::default();

    loop {
        for notice in board.poll_notices() {
            print_notice(&board, &notice);
        }
        println!();
        println!("{}", render_board(&board));
        println!();

        let actions = actions_for(board.active_tab());
        let labels: Vec<String> = actions.iter().map(|a| a.label(&board)).collect();
        let choice = Select::with_theme(&theme)
            .with_prompt("What next? (Esc closes)")
            .items(&labels)
            .default(0)
            .interact_opt()?;

        let trigger = match choice.map(|i| actions[i]) {
            None => Dismissal::EscapeKey,
            Some(Action::Close) => Dismissal::CloseButton,
            Some(action) => {
                run_action(&mut board, action, &theme).await?;
                continue;
            }
        };
        match board.dismiss(trigger) {
            Some(kept) => board = kept,
            None => break,
        }
    }

    println!("Closed.");
    Ok(())
}

async fn run_action(board: &mut SessionBoard, action: Action, theme: &ColorfulTheme) -> Result<()> {
    match action {
        Action::SwitchTab => board.set_active_tab(board.active_tab().other()),
        Action::EditRequest => {
            let text: String = Input::with_theme(theme)
                .with_prompt("Request")
                .with_initial_text(board.request_text())
                .allow_empty(true)
                .interact_text()?;
            board.set_request_text(text);
        }
        Action::BreakDown => {
            if report(board.start_breakdown()).is_some() {
                wait_for_breakdown(board).await;
            }
        }
        Action::EditDraft => {
            if let Some(id) = pick_draft(board, theme, "Draft to edit")? {
                let current = board
                    .drafts()
                    .drafts()
                    .iter()
                    .find(|d| d.id == id)
                    .map(|d| d.description.clone())
                    .unwrap_or_default();
                let text: String = Input::with_theme(theme)
                    .with_prompt("Description")
                    .with_initial_text(current)
                    .allow_empty(true)
                    .interact_text()?;
                report(board.edit_draft(&id, text));
            }
        }
        Action::AddDrafts => board.add_drafts(),
        Action::RemoveDraft => {
            if !board.drafts().can_remove() {
                println!("{} The draft list is already at its minimum size.", WARNING);
            } else if let Some(id) = pick_draft(board, theme, "Draft to remove")? {
                report(board.remove_draft(&id));
            }
        }
        Action::ProcessDrafts => {
            if let Some(count) = report(board.process_manual_tasks()) {
                println!("{} {} tasks ready", SPARKLE, count);
            }
        }
        Action::CreateSession => {
            if let Some(id) = pick_task(board, theme)? {
                report(board.create_session(&id));
            }
        }
        Action::CreateAll => {
            if let Some(started) = report(board.create_all_sessions()) {
                println!("Started {} session launches", started);
            }
        }
        Action::WaitForResults => {
            let spinner = LaunchProgress::breakdown_spinner();
            spinner.set_message("Waiting for results...");
            let notices = board.settle().await;
            spinner.finish_and_clear();
            for notice in &notices {
                print_notice(board, notice);
            }
        }
        Action::EditSettings => edit_settings(board, theme)?,
        Action::ResetTab => board.reset_current_tab(),
        Action::ResetAll => board.reset_all(),
        Action::Close => {}
    }
    Ok(())
}

/// Wait until the breakdown result is applied, showing anything else that
/// finishes in the meantime.
async fn wait_for_breakdown(board: &mut SessionBoard) {
    let spinner = LaunchProgress::breakdown_spinner();
    while let Some(notice) = board.next_notice().await {
        let done = matches!(notice, BoardNotice::TasksReady { .. } | BoardNotice::Alert(_));
        spinner.suspend(|| print_notice(board, &notice));
        if done {
            break;
        }
    }
    spinner.finish_and_clear();
}

fn edit_settings(board: &mut SessionBoard, theme: &ColorfulTheme) -> Result<()> {
    let key = Password::with_theme(theme)
        .with_prompt("Devin API key (empty keeps the current one)")
        .allow_empty_password(true)
        .interact()?;
    let form = board.form_mut();
    if !key.trim().is_empty() {
        form.api_key = gitagu::form::ApiKey::new(key);
    }
    form.repo_url = Input::with_theme(theme)
        .with_prompt("Repository URL")
        .with_initial_text(form.repo_url.clone())
        .allow_empty(true)
        .interact_text()?;
    form.snapshot_id = Input::with_theme(theme)
        .with_prompt("Snapshot id")
        .with_initial_text(form.snapshot_id.clone())
        .allow_empty(true)
        .interact_text()?;
    form.playbook_id = Input::with_theme(theme)
        .with_prompt("Playbook id")
        .with_initial_text(form.playbook_id.clone())
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}

fn pick_draft(board: &SessionBoard, theme: &ColorfulTheme, prompt: &str) -> Result<Option<String>> {
    let drafts = board.drafts().drafts();
    let labels: Vec<String> = drafts
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let text = if d.description.trim().is_empty() {
                "(blank)"
            } else {
                d.description.as_str()
            };
            format!("{:>2}. {}", i + 1, text)
        })
        .collect();
    let choice = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|i| drafts[i].id.clone()))
}

/// Offer the active tab's tasks that can start creation.
fn pick_task(board: &SessionBoard, theme: &ColorfulTheme) -> Result<Option<TaskId>> {
    let candidates: Vec<_> = board
        .active_tasks()
        .iter()
        .filter(|t| t.status.can_start_creation())
        .collect();
    if candidates.is_empty() {
        println!("{} No pending or failed tasks on this tab.", WARNING);
        return Ok(None);
    }
    let labels: Vec<String> = candidates
        .iter()
        .map(|t| format!("{} [{}]", t.title, t.status))
        .collect();
    let choice = Select::with_theme(theme)
        .with_prompt("Task")
        .items(&labels)
        .default(0)
        .interact_opt()?;
    Ok(choice.map(|i| candidates[i].id.clone()))
}

/// Show a board error inline and keep the menu running.
fn report<T>(result: Result<T, BoardError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            println!("{} {}", WARNING, style(e).yellow());
            None
        }
    }
}

fn print_notice(board: &SessionBoard, notice: &BoardNotice) {
    match notice {
        BoardNotice::TasksReady { count } => println!("{} {} tasks ready", SPARKLE, count),
        BoardNotice::Alert(message) => {
            println!("{} {}", WARNING, style(message).yellow().bold())
        }
        BoardNotice::SessionCreated {
            tab,
            task_id,
            session_url,
        } => println!(
            "{} {} {}",
            CHECK,
            task_title(board, *tab, task_id),
            style(session_url).cyan()
        ),
        BoardNotice::SessionFailed {
            tab,
            task_id,
            message,
        } => println!(
            "{} {} {}",
            CROSS,
            task_title(board, *tab, task_id),
            style(message).red()
        ),
    }
}

fn task_title(board: &SessionBoard, tab: Tab, id: &TaskId) -> String {
    board
        .task(tab, id)
        .map(|t| t.title.clone())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_is_tab_specific() {
        let auto = actions_for(Tab::Auto);
        assert!(auto.contains(&Action::BreakDown));
        assert!(!auto.contains(&Action::ProcessDrafts));

        let manual = actions_for(Tab::Manual);
        assert!(manual.contains(&Action::ProcessDrafts));
        assert!(!manual.contains(&Action::EditRequest));
    }

    #[test]
    fn test_menu_always_offers_reset_and_close() {
        for tab in [Tab::Auto, Tab::Manual] {
            let actions = actions_for(tab);
            assert_eq!(actions.first(), Some(&Action::SwitchTab));
            assert_eq!(actions.last(), Some(&Action::Close));
            assert!(actions.contains(&Action::ResetTab));
            assert!(actions.contains(&Action::ResetAll));
        }
    }
}
