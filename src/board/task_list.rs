use std::collections::HashMap;

use tokio::task::JoinHandle;

use crate::task::{Task, TaskId};

/// One tab's tasks plus the session-creation work currently running for them.
///
/// `generation` changes every time the list is cleared or replaced; results
/// stamped with an older generation belong to tasks that no longer exist.
#[derive(Debug, Default)]
pub(crate) struct TaskList {
    pub(crate) tasks: Vec<Task>,
    pub(crate) generation: u64,
    pub(crate) in_flight: HashMap<TaskId, JoinHandle<()>>,
}

impl TaskList {
    pub(crate) fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    /// Drop every task, abort their in-flight work and start a new generation.
    pub(crate) fn clear(&mut self) {
        self.abort_in_flight();
        self.tasks.clear();
        self.generation += 1;
    }

    pub(crate) fn replace(&mut self, tasks: Vec<Task>) {
        self.clear();
        self.tasks = tasks;
    }

    pub(crate) fn abort_in_flight(&mut self) {
        for (_, handle) in self.in_flight.drain() {
            handle.abort();
        }
    }

    /// Forget the handle for a finished task. False when nothing was tracked.
    pub(crate) fn finish(&mut self, id: &TaskId) -> bool {
        self.in_flight.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(n: usize) -> TaskList {
        let mut list = TaskList::default();
        list.replace(Task::from_descriptors(
            1,
            (0..n)
                .map(|i| crate::task::TaskDescriptor {
                    title: format!("t{}", i),
                    description: String::new(),
                })
                .collect(),
        ));
        list
    }

    #[test]
    fn test_replace_bumps_generation() {
        let mut list = TaskList::default();
        assert_eq!(list.generation, 0);
        list.replace(Vec::new());
        assert_eq!(list.generation, 1);
        list.clear();
        assert_eq!(list.generation, 2);
    }

    #[test]
    fn test_lookup_by_id() {
        let mut list = list_with(3);
        let id = TaskId::from("1-1");
        assert_eq!(list.get(&id).unwrap().title, "t1");
        list.get_mut(&id).unwrap().title = "renamed".into();
        assert_eq!(list.get(&id).unwrap().title, "renamed");
        assert!(list.get(&TaskId::from("1-9")).is_none());
    }

    #[tokio::test]
    async fn test_clear_aborts_running_work() {
        let mut list = list_with(1);
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            tx.send(()).ok();
        });
        list.in_flight.insert(TaskId::from("1-0"), handle);

        list.clear();

        assert!(list.in_flight.is_empty());
        assert!(list.tasks.is_empty());
        // The aborted future drops its sender without sending.
        assert!(rx.await.is_err());
    }

    #[test]
    fn test_finish_untracked_is_false() {
        let mut list = list_with(1);
        assert!(!list.finish(&TaskId::from("1-0")));
    }
}
