//! In-memory task collection and the operations over it.
//!
//! The [`TaskManager`] owns the ordered list of tasks for the lifetime of the process.
//! Tasks can be addressed by position, matching what a numbered list on screen shows,
//! or by their stable [`TaskId`], which survives insertions and removals.
//! Out-of-range positions and unknown ids are reported as `false`/`None`, never a panic.

use serde::Serialize;
use tracing::debug;

use crate::fields::State;
use crate::filter::Filter;
use crate::task::{Task, TaskId};

/// Per-state tally of the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,
    pub cancelled: usize,
}

/// Owner of the task collection and the currently installed filter.
#[derive(Default)]
pub struct TaskManager {
    tasks: Vec<Task>,
    filter: Option<Filter>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task and return its id.
    pub fn add(&mut self, task: Task) -> TaskId {
        let id = task.id();
        debug!(%id, title = task.title(), "task added");
        self.tasks.push(task);
        id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Read-only view of every task in insertion order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get_at(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Remove the task at `index`. Returns `false` and leaves the collection alone if out of range.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.tasks.len() {
            return false;
        }
        let removed = self.tasks.remove(index);
        debug!(id = %removed.id(), index, "task removed");
        true
    }

    /// Replace the task at `index`. Returns `false` if out of range.
    pub fn update_at(&mut self, index: usize, task: Task) -> bool {
        match self.tasks.get_mut(index) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id() == id)
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// Replace the task with the given id. Returns `false` if no such task exists.
    pub fn update(&mut self, id: TaskId, task: Task) -> bool {
        match self.position(id) {
            Some(index) => self.update_at(index, task),
            None => false,
        }
    }

    pub fn remove(&mut self, id: TaskId) -> bool {
        match self.position(id) {
            Some(index) => self.remove_at(index),
            None => false,
        }
    }

    /// Case-insensitive substring search over titles, in collection order.
    pub fn find_by_title(&self, query: &str) -> Vec<&Task> {
        let needle = query.to_lowercase();
        self.tasks
            .iter()
            .filter(|t| t.title().to_lowercase().contains(&needle))
            .collect()
    }

    pub fn filter_by_state(&self, state: State) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.state() == state).collect()
    }

    pub fn stats(&self) -> Stats {
        let mut stats = Stats {
            total: self.tasks.len(),
            ..Stats::default()
        };
        for t in &self.tasks {
            match t.state() {
                State::Pending => stats.pending += 1,
                State::InProgress => stats.in_progress += 1,
                State::Done => stats.done += 1,
                State::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }

    /// Remove every done task and return how many were removed.
    pub fn purge_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.is_done());
        let removed = before - self.tasks.len();
        debug!(removed, "completed tasks purged");
        removed
    }

    /// Install the filter used by [`TaskManager::filter_with_current`].
    pub fn set_filter(&mut self, filter: Filter) {
        debug!("filter installed");
        self.filter = Some(filter);
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    /// Apply the installed filter; without one, every task is returned.
    pub fn filter_with_current(&self) -> Vec<&Task> {
        match &self.filter {
            Some(filter) => filter(&self.tasks),
            None => self.tasks.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Difficulty;
    use crate::filter;

    fn task(title: &str, state: State) -> Task {
        Task::new(title, "", state, Difficulty::Easy).unwrap()
    }

    fn manager_with(titles: &[(&str, State)]) -> TaskManager {
        let mut m = TaskManager::new();
        for (title, state) in titles {
            m.add(task(title, *state));
        }
        m
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title().to_string()).collect()
    }

    fn assert_stats_consistent(m: &TaskManager) {
        let s = m.stats();
        assert_eq!(s.total, m.len());
        assert_eq!(s.total, s.pending + s.in_progress + s.done + s.cancelled);
    }

    #[test]
    fn test_stats_and_purge_example() {
        let mut m = manager_with(&[("Buy milk", State::Pending), ("Pay rent", State::Done)]);
        assert_eq!(
            m.stats(),
            Stats { total: 2, pending: 1, in_progress: 0, done: 1, cancelled: 0 }
        );

        assert_eq!(m.purge_completed(), 1);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get_at(0).unwrap().title(), "Buy milk");
        assert_eq!(m.purge_completed(), 0);
    }

    #[test]
    fn test_remove_at_out_of_range_is_noop() {
        let mut m = manager_with(&[("A", State::Pending), ("B", State::Pending)]);
        assert!(!m.remove_at(5));
        assert!(!m.remove_at(2));
        assert_eq!(m.len(), 2);
        assert!(m.get_at(2).is_none());
    }

    #[test]
    fn test_remove_at_valid_index() {
        let mut m = manager_with(&[("A", State::Pending), ("B", State::Done), ("C", State::Pending)]);
        assert!(m.remove_at(1));
        assert_eq!(m.len(), 2);
        assert_eq!(titles(&m.all().iter().collect::<Vec<_>>()), ["A", "C"]);
        assert!(m.remove_at(0));
        assert!(m.remove_at(0));
        assert!(m.is_empty());
        assert!(!m.remove_at(0));
    }

    #[test]
    fn test_update_at() {
        let mut m = manager_with(&[("A", State::Pending)]);
        let edited = m.get_at(0).unwrap().with_state(State::InProgress);
        assert!(m.update_at(0, edited));
        assert_eq!(m.get_at(0).unwrap().state(), State::InProgress);
        assert!(!m.update_at(1, task("B", State::Pending)));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_ids_survive_reordering() {
        let mut m = TaskManager::new();
        let a = m.add(task("A", State::Pending));
        let b = m.add(task("B", State::Pending));
        let c = m.add(task("C", State::Pending));
        assert_eq!(m.position(c), Some(2));

        assert!(m.remove(a));
        assert_eq!(m.position(c), Some(1));
        assert_eq!(m.get(b).unwrap().title(), "B");
        assert!(!m.remove(a));
        assert!(m.get(a).is_none());

        let renamed = m.get(c).unwrap().with_title("C2").unwrap();
        assert!(m.update(c, renamed));
        assert_eq!(m.get_at(1).unwrap().title(), "C2");
        assert!(!m.update(a, task("ghost", State::Pending)));
    }

    #[test]
    fn test_find_by_title_is_case_insensitive() {
        let m = manager_with(&[
            ("Buy milk", State::Pending),
            ("Pay rent", State::Done),
            ("BUY bread", State::InProgress),
        ]);
        assert_eq!(titles(&m.find_by_title("buy")), ["Buy milk", "BUY bread"]);
        assert_eq!(titles(&m.find_by_title("RENT")), ["Pay rent"]);
        assert!(m.find_by_title("xyz").is_empty());
        assert_eq!(m.find_by_title("").len(), 3);
    }

    #[test]
    fn test_filter_by_state() {
        let m = manager_with(&[
            ("A", State::Pending),
            ("B", State::Cancelled),
            ("C", State::Pending),
        ]);
        assert_eq!(titles(&m.filter_by_state(State::Pending)), ["A", "C"]);
        assert_eq!(titles(&m.filter_by_state(State::Cancelled)), ["B"]);
        assert!(m.filter_by_state(State::Done).is_empty());
    }

    #[test]
    fn test_installed_filter() {
        let mut m = manager_with(&[("A", State::Pending), ("B", State::Done)]);
        assert_eq!(m.filter_with_current().len(), 2);

        m.set_filter(filter::by_state(State::Done));
        assert_eq!(titles(&m.filter_with_current()), ["B"]);

        m.add(task("C", State::Done));
        assert_eq!(titles(&m.filter_with_current()), ["B", "C"]);

        m.clear_filter();
        assert_eq!(m.filter_with_current().len(), 3);
    }

    #[test]
    fn test_stats_stay_consistent() {
        let mut m = TaskManager::new();
        assert_stats_consistent(&m);
        for (i, state) in State::ALL.iter().cycle().take(10).enumerate() {
            m.add(task(&format!("t{i}"), *state));
            assert_stats_consistent(&m);
        }
        m.remove_at(3);
        assert_stats_consistent(&m);
        let edited = m.get_at(0).unwrap().with_state(State::Cancelled);
        m.update_at(0, edited);
        assert_stats_consistent(&m);
        m.purge_completed();
        assert_stats_consistent(&m);
        assert_eq!(m.stats().done, 0);
    }
}
