//! The session board: state container behind the launcher.
//!
//! The board owns two task collections (one per [`Tab`]), the manual draft
//! list, the shared [`FormConfig`] and the request text of the auto tab.
//! Remote work runs as spawned `tokio` tasks:
//!
//! - a task breakdown, at most one at a time (`breakdown_busy`)
//! - one session creation per task, with no coordination between them
//!
//! Spawned work never touches board state directly. It reports back over an
//! mpsc channel and the owner applies results with [`SessionBoard::next_notice`]
//! or [`SessionBoard::settle`]. Every result is stamped with the tab and
//! generation it was started for, so anything that finishes after a reset is
//! dropped instead of landing on the wrong (or a cleared) collection.
//!
//! ```no_run
//! use std::sync::Arc;
//! use gitagu::api::HttpBackend;
//! use gitagu::board::SessionBoard;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backend = Arc::new(HttpBackend::new("http://localhost:8000", None)?);
//! let mut board = SessionBoard::new(backend);
//! board.form_mut().api_key = gitagu::form::ApiKey::new("devin-key");
//! board.set_request_text("Fix the login bug and add a user dashboard");
//! board.start_breakdown()?;
//! board.settle().await;
//! board.create_all_sessions()?;
//! for notice in board.settle().await {
//!     println!("{:?}", notice);
//! }
//! # Ok(())
//! # }
//! ```

mod task_list;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{BackendClient, CreatedSession};
use crate::drafts::DraftSet;
use crate::errors::{ApiError, BoardError, TaskError, ValidationError};
use crate::form::{Dismissal, FormConfig, Tab};
use crate::prompt::session_request;
use crate::task::{Task, TaskDescriptor, TaskId};
use task_list::TaskList;

/// Result of remote work, sent from the spawned task to the board.
#[derive(Debug)]
enum BoardEvent {
    BreakdownFinished {
        generation: u64,
        result: Result<Vec<TaskDescriptor>, ApiError>,
    },
    SessionFinished {
        tab: Tab,
        generation: u64,
        task_id: TaskId,
        result: Result<CreatedSession, ApiError>,
    },
}

/// What applying a finished piece of work changed, for the caller to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardNotice {
    /// A breakdown replaced the auto tasks.
    TasksReady { count: usize },
    /// Blocking notification; the task list was left as it was.
    Alert(String),
    SessionCreated {
        tab: Tab,
        task_id: TaskId,
        session_url: String,
    },
    /// Recorded on the task itself; shown inline with a retry option.
    SessionFailed {
        tab: Tab,
        task_id: TaskId,
        message: String,
    },
}

pub struct SessionBoard {
    backend: Arc<dyn BackendClient>,
    form: FormConfig,
    active_tab: Tab,
    request_text: String,
    auto: TaskList,
    manual: TaskList,
    drafts: DraftSet,
    breakdown: Option<JoinHandle<()>>,
    events_tx: mpsc::UnboundedSender<BoardEvent>,
    events_rx: mpsc::UnboundedReceiver<BoardEvent>,
}

impl SessionBoard {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            form: FormConfig::default(),
            active_tab: Tab::Auto,
            request_text: String::new(),
            auto: TaskList::default(),
            manual: TaskList::default(),
            drafts: DraftSet::new(),
            breakdown: None,
            events_tx,
            events_rx,
        }
    }

    pub fn with_form(mut self, form: FormConfig) -> Self {
        self.form = form;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn form(&self) -> &FormConfig {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormConfig {
        &mut self.form
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn request_text(&self) -> &str {
        &self.request_text
    }

    pub fn set_request_text(&mut self, text: impl Into<String>) {
        self.request_text = text.into();
    }

    pub fn drafts(&self) -> &DraftSet {
        &self.drafts
    }

    pub fn tasks(&self, tab: Tab) -> &[Task] {
        &self.list(tab).tasks
    }

    pub fn active_tasks(&self) -> &[Task] {
        self.tasks(self.active_tab)
    }

    pub fn task(&self, tab: Tab, id: &TaskId) -> Option<&Task> {
        self.list(tab).get(id)
    }

    pub fn is_breakdown_busy(&self) -> bool {
        self.breakdown.is_some()
    }

    /// Number of spawned operations whose results have not been applied yet.
    pub fn in_flight(&self) -> usize {
        usize::from(self.breakdown.is_some())
            + self.auto.in_flight.len()
            + self.manual.in_flight.len()
    }

    fn list(&self, tab: Tab) -> &TaskList {
        match tab {
            Tab::Auto => &self.auto,
            Tab::Manual => &self.manual,
        }
    }

    fn list_mut(&mut self, tab: Tab) -> &mut TaskList {
        match tab {
            Tab::Auto => &mut self.auto,
            Tab::Manual => &mut self.manual,
        }
    }

    // ── Drafts ───────────────────────────────────────────────────────

    pub fn add_drafts(&mut self) {
        self.drafts.add_batch();
    }

    pub fn remove_draft(&mut self, id: &str) -> Result<(), BoardError> {
        Ok(self.drafts.remove(id)?)
    }

    pub fn edit_draft(&mut self, id: &str, description: impl Into<String>) -> Result<(), BoardError> {
        Ok(self.drafts.edit(id, description)?)
    }

    /// Replace the manual tasks with the non-blank drafts. Returns the count.
    pub fn process_manual_tasks(&mut self) -> Result<usize, BoardError> {
        let tasks = self.drafts.process(now_millis())?;
        let count = tasks.len();
        self.manual.replace(tasks);
        info!(count, "manual tasks processed");
        Ok(count)
    }

    // ── Breakdown ────────────────────────────────────────────────────

    /// Send the request text to the breakdown service.
    ///
    /// The auto tasks are replaced when the result is applied; on failure
    /// an [`BoardNotice::Alert`] is produced and the tasks stay as they were.
    pub fn start_breakdown(&mut self) -> Result<(), BoardError> {
        if self.breakdown.is_some() {
            return Err(ValidationError::BreakdownInFlight.into());
        }
        let request = self.request_text.trim().to_string();
        if request.is_empty() {
            return Err(ValidationError::EmptyRequest.into());
        }

        let generation = self.auto.generation;
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        info!(chars = request.len(), "starting task breakdown");
        self.breakdown = Some(tokio::spawn(async move {
            let result = backend.breakdown_tasks(&request).await;
            tx.send(BoardEvent::BreakdownFinished { generation, result })
                .ok();
        }));
        Ok(())
    }

    // ── Session creation ─────────────────────────────────────────────

    /// Start creating a Devin session for a task of the active tab.
    ///
    /// The task is `creating` when this returns. The result is bound to the
    /// tab that was active now, even if the user switches tabs before it
    /// arrives. Tasks in `error` can be passed again to retry.
    pub fn create_session(&mut self, task_id: &TaskId) -> Result<(), BoardError> {
        if self.form.api_key.is_blank() {
            return Err(ValidationError::MissingApiKey.into());
        }

        let tab = self.active_tab;
        let list = match tab {
            Tab::Auto => &mut self.auto,
            Tab::Manual => &mut self.manual,
        };
        let task = list
            .get_mut(task_id)
            .ok_or_else(|| TaskError::NotFound(task_id.to_string()))?;
        task.begin_creating()?;
        let request = session_request(task, &self.form);
        debug!(task = %task_id, %tab, "task is creating");

        let generation = list.generation;
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        let id = task_id.clone();
        let handle = tokio::spawn(async move {
            let result = backend.create_session(&request).await;
            tx.send(BoardEvent::SessionFinished {
                tab,
                generation,
                task_id: id,
                result,
            })
            .ok();
        });
        list.in_flight.insert(task_id.clone(), handle);
        Ok(())
    }

    /// Start creation for every `pending` or `error` task of the active tab.
    pub fn create_all_sessions(&mut self) -> Result<usize, BoardError> {
        if self.form.api_key.is_blank() {
            return Err(ValidationError::MissingApiKey.into());
        }
        let ids: Vec<TaskId> = self
            .active_tasks()
            .iter()
            .filter(|t| t.status.can_start_creation())
            .map(|t| t.id.clone())
            .collect();
        for id in &ids {
            self.create_session(id)?;
        }
        Ok(ids.len())
    }

    // ── Applying results ─────────────────────────────────────────────

    /// Wait for the next result and apply it.
    ///
    /// Returns `None` once nothing is in flight. Results of work that was
    /// reset away are skipped.
    pub async fn next_notice(&mut self) -> Option<BoardNotice> {
        while self.in_flight() > 0 {
            let event = self.events_rx.recv().await?;
            if let Some(notice) = self.apply(event) {
                return Some(notice);
            }
        }
        None
    }

    /// Apply results that have already arrived, without waiting.
    pub fn poll_notices(&mut self) -> Vec<BoardNotice> {
        let mut notices = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            if let Some(notice) = self.apply(event) {
                notices.push(notice);
            }
        }
        notices
    }

    /// Wait for everything in flight and apply it, in completion order.
    pub async fn settle(&mut self) -> Vec<BoardNotice> {
        let mut notices = Vec::new();
        while let Some(notice) = self.next_notice().await {
            notices.push(notice);
        }
        notices
    }

    fn apply(&mut self, event: BoardEvent) -> Option<BoardNotice> {
        match event {
            BoardEvent::BreakdownFinished { generation, result } => {
                if generation != self.auto.generation || self.breakdown.take().is_none() {
                    debug!(generation, "discarding stale breakdown result");
                    return None;
                }
                match result {
                    Ok(descriptors) => {
                        let tasks = Task::from_descriptors(now_millis(), descriptors);
                        let count = tasks.len();
                        self.auto.replace(tasks);
                        Some(BoardNotice::TasksReady { count })
                    }
                    Err(e) => {
                        warn!(error = %e, "task breakdown failed");
                        Some(BoardNotice::Alert(format!(
                            "Failed to break down tasks: {}",
                            e.user_message()
                        )))
                    }
                }
            }
            BoardEvent::SessionFinished {
                tab,
                generation,
                task_id,
                result,
            } => {
                let list = self.list_mut(tab);
                if generation != list.generation || !list.finish(&task_id) {
                    debug!(task = %task_id, %tab, "discarding stale session result");
                    return None;
                }
                let task = list.get_mut(&task_id)?;
                match result {
                    Ok(session) => {
                        let url = session.session_url.clone();
                        if let Err(e) = task.mark_created(session.session_id, session.session_url) {
                            warn!(task = %task_id, error = %e, "ignoring session result");
                            return None;
                        }
                        Some(BoardNotice::SessionCreated {
                            tab,
                            task_id,
                            session_url: url,
                        })
                    }
                    Err(e) => {
                        let message = e.user_message();
                        if let Err(err) = task.mark_failed(message.clone()) {
                            warn!(task = %task_id, error = %err, "ignoring session failure");
                            return None;
                        }
                        warn!(task = %task_id, %message, "session creation failed");
                        Some(BoardNotice::SessionFailed {
                            tab,
                            task_id,
                            message,
                        })
                    }
                }
            }
        }
    }

    // ── Reset & close ────────────────────────────────────────────────

    /// Clear the active tab only. The other tab and the form are kept.
    pub fn reset_current_tab(&mut self) {
        match self.active_tab {
            Tab::Auto => self.reset_auto(),
            Tab::Manual => self.reset_manual(),
        }
        debug!(tab = %self.active_tab, "tab reset");
    }

    /// Clear both tabs and every form field, and go back to the auto tab.
    pub fn reset_all(&mut self) {
        self.reset_auto();
        self.reset_manual();
        self.form = FormConfig::default();
        self.active_tab = Tab::Auto;
        debug!("board reset");
    }

    fn reset_auto(&mut self) {
        if let Some(handle) = self.breakdown.take() {
            handle.abort();
        }
        self.auto.clear();
        self.request_text.clear();
    }

    fn reset_manual(&mut self) {
        self.manual.clear();
        self.drafts = DraftSet::new();
    }

    /// Handle a dismissal trigger. Returns the board back when the trigger
    /// does not close it.
    pub fn dismiss(self, trigger: Dismissal) -> Option<Self> {
        if trigger.closes() {
            self.close();
            None
        } else {
            Some(self)
        }
    }

    /// Close the board, abandoning any work still in flight.
    pub fn close(mut self) {
        let abandoned = self.in_flight();
        self.abort_all();
        if abandoned > 0 {
            info!(abandoned, "closed with work in flight");
        }
    }

    fn abort_all(&mut self) {
        if let Some(handle) = self.breakdown.take() {
            handle.abort();
        }
        self.auto.abort_in_flight();
        self.manual.abort_in_flight();
    }
}

impl Drop for SessionBoard {
    fn drop(&mut self) {
        self.abort_all();
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
