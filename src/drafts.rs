//! Manually entered task drafts.
//!
//! The list always holds at least [`DRAFT_FLOOR`] entries. It grows in
//! batches of [`DRAFT_BATCH`] and is turned into pending tasks by
//! [`DraftSet::process`].

use uuid::Uuid;

use crate::errors::{DraftError, ValidationError};
use crate::task::{Task, TaskId, title_from_description};

/// Number of drafts a fresh set starts with, and the minimum it can shrink to.
pub const DRAFT_FLOOR: usize = 5;

/// Number of drafts appended by [`DraftSet::add_batch`].
pub const DRAFT_BATCH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualTaskDraft {
    pub id: String,
    pub description: String,
}

impl ManualTaskDraft {
    fn blank() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DraftSet {
    drafts: Vec<ManualTaskDraft>,
}

impl Default for DraftSet {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftSet {
    pub fn new() -> Self {
        Self {
            drafts: (0..DRAFT_FLOOR).map(|_| ManualTaskDraft::blank()).collect(),
        }
    }

    pub fn drafts(&self) -> &[ManualTaskDraft] {
        &self.drafts
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Whether removing a draft is currently allowed.
    pub fn can_remove(&self) -> bool {
        self.drafts.len() > DRAFT_FLOOR
    }

    pub fn add_batch(&mut self) {
        self.drafts
            .extend((0..DRAFT_BATCH).map(|_| ManualTaskDraft::blank()));
    }

    pub fn remove(&mut self, id: &str) -> Result<(), DraftError> {
        if !self.can_remove() {
            return Err(DraftError::AtFloor { floor: DRAFT_FLOOR });
        }
        let pos = self
            .drafts
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| DraftError::NotFound(id.to_string()))?;
        self.drafts.remove(pos);
        Ok(())
    }

    pub fn edit(&mut self, id: &str, description: impl Into<String>) -> Result<(), DraftError> {
        let draft = self
            .drafts
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| DraftError::NotFound(id.to_string()))?;
        draft.description = description.into();
        Ok(())
    }

    /// Turn every non-blank draft into a pending task.
    ///
    /// `index` in the fallback title counts processed tasks, not draft slots.
    pub fn process(&self, millis: i64) -> Result<Vec<Task>, ValidationError> {
        let descriptions: Vec<&str> = self
            .drafts
            .iter()
            .map(|d| d.description.trim())
            .filter(|d| !d.is_empty())
            .collect();
        if descriptions.is_empty() {
            return Err(ValidationError::NoManualTasks);
        }

        let ids = TaskId::batch(millis, descriptions.len());
        Ok(ids
            .into_iter()
            .zip(descriptions)
            .enumerate()
            .map(|(index, (id, description))| {
                Task::pending(id, title_from_description(description, index), description)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    fn set_with(descriptions: &[&str]) -> DraftSet {
        let mut set = DraftSet::new();
        while set.len() < descriptions.len() {
            set.add_batch();
        }
        let ids: Vec<String> = set.drafts().iter().map(|d| d.id.clone()).collect();
        for (id, text) in ids.iter().zip(descriptions) {
            set.edit(id, *text).unwrap();
        }
        set
    }

    #[test]
    fn test_new_set_has_five_blank_drafts() {
        let set = DraftSet::new();
        assert_eq!(set.len(), 5);
        assert!(set.drafts().iter().all(|d| d.description.is_empty()));
        assert!(!set.can_remove());
    }

    #[test]
    fn test_draft_ids_are_unique() {
        let mut set = DraftSet::new();
        set.add_batch();
        let mut ids: Vec<&str> = set.drafts().iter().map(|d| d.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_add_batch_appends_three() {
        let mut set = DraftSet::new();
        set.add_batch();
        assert_eq!(set.len(), 8);
        set.add_batch();
        assert_eq!(set.len(), 11);
    }

    #[test]
    fn test_remove_blocked_at_floor() {
        let mut set = DraftSet::new();
        let id = set.drafts()[0].id.clone();
        assert_eq!(set.remove(&id), Err(DraftError::AtFloor { floor: 5 }));
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_remove_above_floor() {
        let mut set = DraftSet::new();
        set.add_batch();
        let id = set.drafts()[6].id.clone();
        set.remove(&id).unwrap();
        assert_eq!(set.len(), 7);
        assert!(set.drafts().iter().all(|d| d.id != id));
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut set = DraftSet::new();
        set.add_batch();
        assert_eq!(
            set.remove("missing"),
            Err(DraftError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_edit_unknown_id() {
        let mut set = DraftSet::new();
        assert!(matches!(set.edit("nope", "x"), Err(DraftError::NotFound(_))));
    }

    #[test]
    fn test_process_skips_blank_drafts() {
        let set = set_with(&["fix the bug", ""]);
        let tasks = set.process(7).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "fix the bug");
        assert_eq!(tasks[0].description, "fix the bug");
        assert_eq!(tasks[0].status, TaskStatus::Pending);
        assert_eq!(tasks[0].id, TaskId::from("7-0"));
    }

    #[test]
    fn test_process_trims_and_titles_long_descriptions() {
        let set = set_with(&["   ", "  migrate the settings page to the new form library  "]);
        let tasks = set.process(1).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "migrate the settings page to the...");
        assert_eq!(
            tasks[0].description,
            "migrate the settings page to the new form library"
        );
    }

    #[test]
    fn test_process_with_no_content_is_rejected() {
        let set = set_with(&["", "  ", "\n"]);
        assert_eq!(set.process(1), Err(ValidationError::NoManualTasks));
    }

    #[test]
    fn test_process_keeps_draft_order() {
        let set = set_with(&["a", "", "b", "c"]);
        let titles: Vec<String> = set.process(1).unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }
}
