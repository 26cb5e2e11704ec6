//! Enumerations and field types for tasks.
//!
//! This module defines the closed value sets used to describe a task: its lifecycle
//! state, the difficulty of a basic task, the computed priority hint, and the names
//! of the built-in filter strategies.

use clap::ValueEnum;
use serde::Serialize;

/// Lifecycle stage of a task.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum State {
    Pending,
    InProgress,
    Done,
    Cancelled,
}

impl State {
    /// Every state in menu order.
    pub const ALL: [State; 4] = [State::Pending, State::InProgress, State::Done, State::Cancelled];

    /// Map a 1-based menu choice onto a state.
    pub fn from_choice(choice: u32) -> Option<State> {
        match choice {
            1 => Some(State::Pending),
            2 => Some(State::InProgress),
            3 => Some(State::Done),
            4 => Some(State::Cancelled),
            _ => None,
        }
    }

    /// The state that follows this one when cycling through states in a UI.
    pub fn next(self) -> State {
        match self {
            State::Pending => State::InProgress,
            State::InProgress => State::Done,
            State::Done => State::Cancelled,
            State::Cancelled => State::Pending,
        }
    }
}

/// Subjective effort rating of a basic task.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Hard,
    Medium,
    #[default]
    Easy,
}

impl Difficulty {
    /// Map a 1-based menu choice onto a difficulty.
    pub fn from_choice(choice: u32) -> Option<Difficulty> {
        match choice {
            1 => Some(Difficulty::Hard),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Easy),
            _ => None,
        }
    }
}

/// Urgency hint derived from a task's kind and data.
///
/// Variants are ordered from least to most urgent so priorities can be compared.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Map a 1-based menu choice onto a priority.
    pub fn from_choice(choice: u32) -> Option<Priority> {
        match choice {
            1 => Some(Priority::Low),
            2 => Some(Priority::Medium),
            3 => Some(Priority::High),
            4 => Some(Priority::Urgent),
            _ => None,
        }
    }
}

/// Named built-in filter strategies, also accepted by `taskdeck ui --filter`.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum FilterChoice {
    #[default]
    All,
    Pending,
    InProgress,
    Done,
    Cancelled,
    Overdue,
    Recurring,
}

/// Format a task state for display.
pub fn format_state(s: State) -> &'static str {
    match s {
        State::Pending => "Pending",
        State::InProgress => "In Progress",
        State::Done => "Done",
        State::Cancelled => "Cancelled",
    }
}

/// Format a difficulty for display.
pub fn format_difficulty(d: Difficulty) -> &'static str {
    match d {
        Difficulty::Hard => "Hard",
        Difficulty::Medium => "Medium",
        Difficulty::Easy => "Easy",
    }
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
        Priority::Urgent => "Urgent",
    }
}

/// Format a filter choice for display.
pub fn format_filter(f: FilterChoice) -> &'static str {
    match f {
        FilterChoice::All => "All",
        FilterChoice::Pending => "Pending",
        FilterChoice::InProgress => "In Progress",
        FilterChoice::Done => "Done",
        FilterChoice::Cancelled => "Cancelled",
        FilterChoice::Overdue => "Overdue",
        FilterChoice::Recurring => "Recurring",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choices() {
        assert_eq!(State::from_choice(2), Some(State::InProgress));
        assert_eq!(State::from_choice(0), None);
        assert_eq!(State::from_choice(5), None);
        assert_eq!(Difficulty::from_choice(1), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_choice(4), None);
        assert_eq!(Priority::from_choice(4), Some(Priority::Urgent));
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn test_state_cycle_visits_every_state() {
        let mut s = State::Pending;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(s);
            s = s.next();
        }
        assert_eq!(s, State::Pending);
        assert_eq!(seen, State::ALL.to_vec());
    }
}
