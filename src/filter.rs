//! Pluggable filter strategies.
//!
//! A filter is a plain boxed closure that narrows a slice of tasks to the ones it keeps,
//! preserving their order. The manager stores one and applies it on demand.

use crate::fields::{FilterChoice, Priority, State};
use crate::task::Task;

pub type Filter = Box<dyn Fn(&[Task]) -> Vec<&Task>>;

/// Box a closure as a [`Filter`], pinning its signature to the higher-ranked form.
pub fn make_filter<F>(f: F) -> Filter
where
    F: for<'a> Fn(&'a [Task]) -> Vec<&'a Task> + 'static,
{
    Box::new(f)
}

fn keep_where<P>(pred: P) -> Filter
where
    P: Fn(&Task) -> bool + 'static,
{
    make_filter(move |tasks| tasks.iter().filter(|t| pred(t)).collect())
}

/// Keeps every task.
pub fn all() -> Filter {
    make_filter(|tasks| tasks.iter().collect())
}

pub fn by_state(state: State) -> Filter {
    keep_where(move |t| t.state() == state)
}

/// Keeps tasks whose computed priority, evaluated when the filter runs, equals `priority`.
pub fn by_priority(priority: Priority) -> Filter {
    keep_where(move |t| t.compute_priority() == priority)
}

pub fn overdue() -> Filter {
    keep_where(Task::is_overdue)
}

pub fn recurring() -> Filter {
    keep_where(Task::is_recurring)
}

impl FilterChoice {
    pub fn into_filter(self) -> Filter {
        match self {
            FilterChoice::All => all(),
            FilterChoice::Pending => by_state(State::Pending),
            FilterChoice::InProgress => by_state(State::InProgress),
            FilterChoice::Done => by_state(State::Done),
            FilterChoice::Cancelled => by_state(State::Cancelled),
            FilterChoice::Overdue => overdue(),
            FilterChoice::Recurring => recurring(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Difficulty;
    use chrono::{Duration, Utc};

    fn sample() -> Vec<Task> {
        vec![
            Task::new("Hard pending", "", State::Pending, Difficulty::Hard).unwrap(),
            Task::new("Started", "", State::InProgress, Difficulty::Easy).unwrap(),
            Task::deadline("Late", "", State::Pending, Utc::now() - Duration::days(2), Priority::High).unwrap(),
            Task::deadline("Late but done", "", State::Done, Utc::now() - Duration::days(2), Priority::Low).unwrap(),
            Task::recurring("Water plants", "", State::Pending, 7).unwrap(),
        ]
    }

    fn titles<'a>(tasks: &[&'a Task]) -> Vec<&'a str> {
        tasks.iter().map(|t| t.title()).collect()
    }

    #[test]
    fn test_all_keeps_everything_in_order() {
        let tasks = sample();
        let kept = all()(&tasks);
        assert_eq!(kept.len(), tasks.len());
        assert_eq!(kept[0].title(), "Hard pending");
        assert_eq!(kept[4].title(), "Water plants");
    }

    #[test]
    fn test_by_state() {
        let tasks = sample();
        assert_eq!(titles(&by_state(State::Pending)(&tasks)), ["Hard pending", "Late", "Water plants"]);
        assert_eq!(titles(&by_state(State::Done)(&tasks)), ["Late but done"]);
        assert!(by_state(State::Cancelled)(&tasks).is_empty());
    }

    #[test]
    fn test_overdue_skips_done_tasks() {
        let tasks = sample();
        assert_eq!(titles(&overdue()(&tasks)), ["Late"]);
    }

    #[test]
    fn test_recurring_only() {
        let tasks = sample();
        assert_eq!(titles(&recurring()(&tasks)), ["Water plants"]);
    }

    #[test]
    fn test_by_computed_priority() {
        let tasks = sample();
        assert_eq!(titles(&by_priority(Priority::High)(&tasks)), ["Hard pending"]);
        assert_eq!(titles(&by_priority(Priority::Medium)(&tasks)), ["Started"]);
        assert_eq!(titles(&by_priority(Priority::Urgent)(&tasks)), ["Late", "Late but done"]);
        assert_eq!(titles(&by_priority(Priority::Low)(&tasks)), ["Water plants"]);
    }

    #[test]
    fn test_filter_choices_map_to_strategies() {
        let tasks = sample();
        assert_eq!(FilterChoice::All.into_filter()(&tasks).len(), 5);
        assert_eq!(FilterChoice::InProgress.into_filter()(&tasks).len(), 1);
        assert_eq!(FilterChoice::Overdue.into_filter()(&tasks).len(), 1);
        assert_eq!(FilterChoice::Recurring.into_filter()(&tasks).len(), 1);
    }
}
