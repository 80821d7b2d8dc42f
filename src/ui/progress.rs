use crate::board::BoardNotice;
use crate::ui::icons::{CHECK, CROSS, SPARKLE, WARNING};
use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Terminal feedback while sessions are being created, rendered via `indicatif`.
///
/// Two bars are stacked vertically:
/// - Session bar: how many launches have finished out of the total
/// - Status spinner: what the board is waiting on
///
/// Per-task outcomes are printed above the bars as they arrive.
pub struct LaunchProgress {
    multi: MultiProgress,
    session_bar: ProgressBar,
    spinner: ProgressBar,
    failed: usize,
}

impl LaunchProgress {
    /// Create the UI for `total` session launches.
    pub fn new(total: u64) -> Self {
        let multi = MultiProgress::new();

        let bar_style = ProgressStyle::default_bar()
            .template("{prefix:.bold.dim} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress bar template is a valid static string")
            .progress_chars("█▓▒░");

        let session_bar = multi.add(ProgressBar::new(total));
        session_bar.set_style(bar_style);
        session_bar.set_prefix("Sessions");

        let spinner_style = ProgressStyle::default_spinner()
            .template("{prefix:.bold.dim} {spinner} {msg}")
            .expect("progress bar template is a valid static string");

        let spinner = multi.add(ProgressBar::new_spinner());
        spinner.set_style(spinner_style);
        spinner.set_prefix("    Wait");

        Self {
            multi,
            session_bar,
            spinner,
            failed: 0,
        }
    }

    /// Spinner shown while a single breakdown request is running.
    pub fn breakdown_spinner() -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .expect("progress bar template is a valid static string"),
        );
        spinner.set_message("Breaking down tasks...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    /// Print a line via `MultiProgress`, falling back to `eprintln!` if the rich UI fails.
    fn print_line(&self, msg: impl AsRef<str>) {
        if self.multi.println(msg.as_ref()).is_err() {
            eprintln!("{}", msg.as_ref());
        }
    }

    pub fn start(&self) {
        self.spinner
            .set_message(format!("{}", style("creating Devin sessions").dim()));
        self.spinner.enable_steady_tick(Duration::from_millis(100));
    }

    /// Record one applied board notice.
    ///
    /// `title` is the task title, looked up by the caller since the notice
    /// only carries the id.
    pub fn record(&mut self, notice: &BoardNotice, title: &str) {
        match notice {
            BoardNotice::SessionCreated { session_url, .. } => {
                self.session_bar.inc(1);
                self.print_line(format!(
                    "  {} {} {}",
                    CHECK,
                    style(title).bold(),
                    style(session_url).cyan()
                ));
            }
            BoardNotice::SessionFailed { message, .. } => {
                self.session_bar.inc(1);
                self.failed += 1;
                self.print_line(format!(
                    "  {} {} {}",
                    CROSS,
                    style(title).bold(),
                    style(message).red()
                ));
            }
            BoardNotice::TasksReady { count } => {
                self.print_line(format!("  {} {} tasks ready", SPARKLE, count));
            }
            BoardNotice::Alert(message) => {
                self.print_line(format!("  {} {}", WARNING, style(message).yellow()));
            }
        }
        self.session_bar
            .set_message(format!("{}", style(format!("({} failed)", self.failed)).dim()));
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Stop both bars and leave a one-line summary.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
        let done = self.session_bar.position();
        let created = done.saturating_sub(self.failed as u64);
        let summary = if self.failed == 0 {
            format!("{} {} sessions created", CHECK, created)
        } else {
            format!(
                "{} {} created, {} failed",
                WARNING,
                created,
                style(self.failed).red()
            )
        };
        self.session_bar.finish_with_message(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Tab;
    use crate::task::TaskId;

    #[test]
    fn test_record_counts_failures() {
        let mut progress = LaunchProgress::new(3);
        progress.record(
            &BoardNotice::SessionCreated {
                tab: Tab::Auto,
                task_id: TaskId::from("1-0"),
                session_url: "https://app.devin.ai/sessions/a".into(),
            },
            "First",
        );
        progress.record(
            &BoardNotice::SessionFailed {
                tab: Tab::Auto,
                task_id: TaskId::from("1-1"),
                message: "HTTP 500".into(),
            },
            "Second",
        );
        assert_eq!(progress.failed(), 1);
        assert_eq!(progress.session_bar.position(), 2);
        progress.finish();
    }

    #[test]
    fn test_alerts_do_not_advance_bar() {
        let mut progress = LaunchProgress::new(1);
        progress.record(&BoardNotice::Alert("nope".into()), "");
        assert_eq!(progress.session_bar.position(), 0);
        assert_eq!(progress.failed(), 0);
    }
}
