//! Plain-text task cards.

use console::style;

use crate::board::SessionBoard;
use crate::form::Tab;
use crate::task::{Task, TaskStatus};
use crate::ui::icons::{CHECK, CREATING, CROSS, LINK, PENDING};

/// Width descriptions are wrapped to inside a card.
const CARD_WIDTH: usize = 76;

fn status_badge(status: TaskStatus) -> String {
    match status {
        TaskStatus::Pending => format!("{}{}", PENDING, style("pending").dim()),
        TaskStatus::Creating => format!("{}{}", CREATING, style("creating").yellow()),
        TaskStatus::Created => format!("{}{}", CHECK, style("created").green()),
        TaskStatus::Error => format!("{}{}", CROSS, style("error").red()),
    }
}

/// Render one task as a numbered card, ending without a trailing newline.
fn render_task(index: usize, task: &Task) -> String {
    let mut lines = vec![format!(
        "{:>2}. {}  {}",
        index + 1,
        style(&task.title).bold(),
        status_badge(task.status)
    )];
    for line in textwrap::wrap(&task.description, CARD_WIDTH) {
        lines.push(format!("    {}", line));
    }
    if let Some(url) = &task.session_url {
        lines.push(format!("    {}{}", LINK, style(url).cyan().underlined()));
    }
    if let Some(err) = &task.error {
        lines.push(format!(
            "    {} {}",
            style(err).red(),
            style("(retry available)").dim()
        ));
    }
    lines.join("\n")
}

pub fn render_tasks(tasks: &[Task]) -> String {
    tasks
        .iter()
        .enumerate()
        .map(|(i, t)| render_task(i, t))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Header plus the active tab's content.
pub fn render_board(board: &SessionBoard) -> String {
    let tab = board.active_tab();
    let tab_label = |t: Tab| {
        let label = match t {
            Tab::Auto => "Auto breakdown",
            Tab::Manual => "Manual tasks",
        };
        if t == tab {
            style(format!("[{}]", label)).bold().cyan().to_string()
        } else {
            style(format!(" {} ", label)).dim().to_string()
        }
    };

    let mut out = vec![format!("{}  {}", tab_label(Tab::Auto), tab_label(Tab::Manual))];

    let form = board.form();
    let key_state = if form.api_key.is_blank() {
        style("not set").red().to_string()
    } else {
        style("set").green().to_string()
    };
    out.push(format!(
        "API key: {}   Repo: {}",
        key_state,
        display_or_dash(&form.repo_url)
    ));
    out.push(format!(
        "Snapshot: {}   Playbook: {}",
        display_or_dash(&form.snapshot_id),
        display_or_dash(&form.playbook_id)
    ));
    out.push(String::new());

    match tab {
        Tab::Auto => {
            out.push(format!("Request: {}", display_or_dash(board.request_text())));
            if board.is_breakdown_busy() {
                out.push(format!("{}{}", CREATING, style("Breaking down tasks...").yellow()));
            }
        }
        Tab::Manual => {
            for (i, draft) in board.drafts().drafts().iter().enumerate() {
                out.push(format!("  draft {:>2}: {}", i + 1, display_or_dash(&draft.description)));
            }
        }
    }

    let tasks = board.active_tasks();
    if !tasks.is_empty() {
        out.push(String::new());
        out.push(render_tasks(tasks));
    }
    out.join("\n")
}

fn display_or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        style("-").dim().to_string()
    } else {
        value.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;
    use console::strip_ansi_codes;

    fn task(status: TaskStatus) -> Task {
        let mut t = Task::pending(TaskId::from("1-0"), "Fix login", "The login button does nothing");
        t.status = status;
        t
    }

    #[test]
    fn test_pending_card() {
        let card = render_task(0, &task(TaskStatus::Pending));
        let plain = strip_ansi_codes(&card);
        assert!(plain.starts_with(" 1. Fix login"));
        assert!(plain.contains("pending"));
        assert!(plain.contains("The login button does nothing"));
    }

    #[test]
    fn test_created_card_shows_url() {
        let mut t = task(TaskStatus::Created);
        t.session_url = Some("https://app.devin.ai/sessions/1".into());
        let plain = strip_ansi_codes(&render_task(1, &t)).to_string();
        assert!(plain.contains(" 2. Fix login"));
        assert!(plain.contains("https://app.devin.ai/sessions/1"));
    }

    #[test]
    fn test_error_card_shows_message_and_retry() {
        let mut t = task(TaskStatus::Error);
        t.error = Some("Devin API unreachable".into());
        let plain = strip_ansi_codes(&render_task(0, &t)).to_string();
        assert!(plain.contains("Devin API unreachable"));
        assert!(plain.contains("retry"));
    }

    #[test]
    fn test_long_description_wraps() {
        let mut t = task(TaskStatus::Pending);
        t.description = "word ".repeat(40);
        let card = render_task(0, &t);
        assert!(card.lines().count() > 2);
    }

    #[test]
    fn test_render_tasks_separates_cards() {
        let tasks = vec![task(TaskStatus::Pending), task(TaskStatus::Creating)];
        let out = render_tasks(&tasks);
        assert!(out.contains("\n\n"));
        assert!(strip_ansi_codes(&out).contains("creating"));
    }
}
