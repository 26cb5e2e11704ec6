//! Task data structure and related functionality.
//!
//! A [`Task`] is an immutable value: every update returns a new task with the field
//! replaced and `last_edited_at` refreshed, leaving the original untouched. The kind
//! specific data (difficulty, deadline, recurrence) lives in the closed [`TaskKind`]
//! sum type so that priority and summary rendering are exhaustive matches.
//!
//! Time-dependent queries come in pairs: `foo_at(now)` takes an explicit clock value and
//! `foo()` evaluates it against the current time.

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::dates::{days_ceil, days_floor, format_date, format_due_relative};
use crate::error::TaskError;
use crate::fields::*;

/// Stable opaque identifier assigned to a task when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        TaskId(Uuid::new_v4())
    }

    /// First eight hex digits, enough to tell tasks apart on screen.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind-specific task data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TaskKind {
    Basic {
        difficulty: Difficulty,
    },
    Deadline {
        due_at: DateTime<Utc>,
        priority: Priority,
    },
    Recurring {
        interval_days: u32,
        last_run_at: DateTime<Utc>,
    },
}

impl TaskKind {
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Basic { .. } => "Basic",
            TaskKind::Deadline { .. } => "Deadline",
            TaskKind::Recurring { .. } => "Recurring",
        }
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    state: State,
    kind: TaskKind,
    created_at: DateTime<Utc>,
    last_edited_at: DateTime<Utc>,
}

fn validated_title(title: &str) -> Result<String, TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn validated_interval(interval_days: u32) -> Result<u32, TaskError> {
    if interval_days == 0 {
        return Err(TaskError::NonPositiveInterval);
    }
    Ok(interval_days)
}

impl Task {
    fn build(title: &str, description: &str, state: State, kind: TaskKind, now: DateTime<Utc>) -> Result<Self, TaskError> {
        Ok(Task {
            id: TaskId::new(),
            title: validated_title(title)?,
            description: description.to_string(),
            state,
            kind,
            created_at: now,
            last_edited_at: now,
        })
    }

    /// Create a basic task.
    pub fn new(title: &str, description: &str, state: State, difficulty: Difficulty) -> Result<Self, TaskError> {
        Self::build(title, description, state, TaskKind::Basic { difficulty }, Utc::now())
    }

    /// Create a basic task with an empty description, pending and easy.
    pub fn basic(title: &str) -> Result<Self, TaskError> {
        Self::new(title, "", State::Pending, Difficulty::default())
    }

    /// Create a task bound to a deadline.
    pub fn deadline(
        title: &str,
        description: &str,
        state: State,
        due_at: DateTime<Utc>,
        priority: Priority,
    ) -> Result<Self, TaskError> {
        Self::build(title, description, state, TaskKind::Deadline { due_at, priority }, Utc::now())
    }

    /// Create a recurring task whose last run is stamped now.
    pub fn recurring(title: &str, description: &str, state: State, interval_days: u32) -> Result<Self, TaskError> {
        let interval_days = validated_interval(interval_days)?;
        let now = Utc::now();
        Self::build(title, description, state, TaskKind::Recurring { interval_days, last_run_at: now }, now)
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_edited_at(&self) -> DateTime<Utc> {
        self.last_edited_at
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match self.kind {
            TaskKind::Basic { difficulty } => Some(difficulty),
            _ => None,
        }
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        match self.kind {
            TaskKind::Deadline { due_at, .. } => Some(due_at),
            _ => None,
        }
    }

    /// The priority stored on a deadline task, as opposed to the computed one.
    pub fn assigned_priority(&self) -> Option<Priority> {
        match self.kind {
            TaskKind::Deadline { priority, .. } => Some(priority),
            _ => None,
        }
    }

    pub fn interval_days(&self) -> Option<u32> {
        match self.kind {
            TaskKind::Recurring { interval_days, .. } => Some(interval_days),
            _ => None,
        }
    }

    pub fn last_run_at(&self) -> Option<DateTime<Utc>> {
        match self.kind {
            TaskKind::Recurring { last_run_at, .. } => Some(last_run_at),
            _ => None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self.kind, TaskKind::Recurring { .. })
    }

    fn edited(&self, now: DateTime<Utc>) -> Task {
        Task {
            last_edited_at: now,
            ..self.clone()
        }
    }

    pub fn with_title(&self, title: &str) -> Result<Task, TaskError> {
        let title = validated_title(title)?;
        Ok(Task { title, ..self.edited(Utc::now()) })
    }

    pub fn with_description(&self, description: &str) -> Task {
        Task {
            description: description.to_string(),
            ..self.edited(Utc::now())
        }
    }

    pub fn with_state(&self, state: State) -> Task {
        Task { state, ..self.edited(Utc::now()) }
    }

    pub fn with_difficulty(&self, difficulty: Difficulty) -> Result<Task, TaskError> {
        match self.kind {
            TaskKind::Basic { .. } => Ok(Task {
                kind: TaskKind::Basic { difficulty },
                ..self.edited(Utc::now())
            }),
            _ => Err(TaskError::KindMismatch { expected: "basic" }),
        }
    }

    pub fn with_due_at(&self, due_at: DateTime<Utc>) -> Result<Task, TaskError> {
        match self.kind {
            TaskKind::Deadline { priority, .. } => Ok(Task {
                kind: TaskKind::Deadline { due_at, priority },
                ..self.edited(Utc::now())
            }),
            _ => Err(TaskError::KindMismatch { expected: "deadline" }),
        }
    }

    pub fn with_priority(&self, priority: Priority) -> Result<Task, TaskError> {
        match self.kind {
            TaskKind::Deadline { due_at, .. } => Ok(Task {
                kind: TaskKind::Deadline { due_at, priority },
                ..self.edited(Utc::now())
            }),
            _ => Err(TaskError::KindMismatch { expected: "deadline" }),
        }
    }

    pub fn with_interval(&self, interval_days: u32) -> Result<Task, TaskError> {
        match self.kind {
            TaskKind::Recurring { last_run_at, .. } => {
                let interval_days = validated_interval(interval_days)?;
                Ok(Task {
                    kind: TaskKind::Recurring { interval_days, last_run_at },
                    ..self.edited(Utc::now())
                })
            }
            _ => Err(TaskError::KindMismatch { expected: "recurring" }),
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    pub fn days_since_creation(&self) -> i64 {
        self.days_since_creation_at(Utc::now())
    }

    pub fn days_since_creation_at(&self, now: DateTime<Utc>) -> i64 {
        days_floor(self.created_at, now)
    }

    /// Days left until the deadline, rounded up. `None` for tasks without one.
    pub fn days_remaining(&self) -> Option<i64> {
        self.days_remaining_at(Utc::now())
    }

    pub fn days_remaining_at(&self, now: DateTime<Utc>) -> Option<i64> {
        self.due_at().map(|due| days_ceil(now, due))
    }

    /// A deadline task is overdue once its due time has passed and it is not done.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match self.due_at() {
            Some(due) => now > due && !self.is_done(),
            None => false,
        }
    }

    pub fn days_since_last_run(&self) -> Option<i64> {
        self.days_since_last_run_at(Utc::now())
    }

    pub fn days_since_last_run_at(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_run_at().map(|last| days_floor(last, now))
    }

    /// Record a run of a recurring task: stamps the run time and marks it done.
    pub fn mark_run(&self) -> Result<Task, TaskError> {
        self.mark_run_at(Utc::now())
    }

    pub fn mark_run_at(&self, now: DateTime<Utc>) -> Result<Task, TaskError> {
        match self.kind {
            TaskKind::Recurring { interval_days, .. } => Ok(Task {
                state: State::Done,
                kind: TaskKind::Recurring { interval_days, last_run_at: now },
                ..self.edited(now)
            }),
            _ => Err(TaskError::KindMismatch { expected: "recurring" }),
        }
    }

    /// Put a recurring task back to pending, restarting its interval from now.
    pub fn reset(&self) -> Result<Task, TaskError> {
        self.reset_at(Utc::now())
    }

    pub fn reset_at(&self, now: DateTime<Utc>) -> Result<Task, TaskError> {
        match self.kind {
            TaskKind::Recurring { interval_days, .. } => Ok(Task {
                state: State::Pending,
                kind: TaskKind::Recurring { interval_days, last_run_at: now },
                ..self.edited(now)
            }),
            _ => Err(TaskError::KindMismatch { expected: "recurring" }),
        }
    }

    pub fn compute_priority(&self) -> Priority {
        self.compute_priority_at(Utc::now())
    }

    pub fn compute_priority_at(&self, now: DateTime<Utc>) -> Priority {
        match self.kind {
            TaskKind::Basic { difficulty } => match (self.state, difficulty) {
                (State::Pending, Difficulty::Hard) => Priority::High,
                (State::InProgress, _) => Priority::Medium,
                _ => Priority::Low,
            },
            TaskKind::Deadline { due_at, .. } => match days_ceil(now, due_at) {
                d if d <= 1 => Priority::Urgent,
                d if d <= 3 => Priority::High,
                d if d <= 7 => Priority::Medium,
                _ => Priority::Low,
            },
            TaskKind::Recurring { interval_days, last_run_at } => {
                let since = days_floor(last_run_at, now);
                let interval = i64::from(interval_days);
                if since >= interval {
                    Priority::High
                } else if since >= interval - 1 {
                    Priority::Medium
                } else {
                    Priority::Low
                }
            }
        }
    }

    /// Kind-specific detail shown after the title in one-line summaries.
    pub fn kind_detail_at(&self, now: DateTime<Utc>) -> String {
        match self.kind {
            TaskKind::Basic { difficulty } => format!("Difficulty: {}", format_difficulty(difficulty)),
            TaskKind::Deadline { due_at, .. } => {
                let today = now.with_timezone(&Local).date_naive();
                format!("Due: {} ({})", format_date(due_at), format_due_relative(due_at, today))
            }
            TaskKind::Recurring { interval_days, last_run_at } => {
                let unit = if interval_days == 1 { "day" } else { "days" };
                format!(
                    "Every {} {} (last run {}d ago)",
                    interval_days,
                    unit,
                    days_floor(last_run_at, now)
                )
            }
        }
    }

    /// Single-line description, e.g. "[Pending] Buy milk - Difficulty: Easy".
    pub fn summary(&self) -> String {
        self.summary_at(Utc::now())
    }

    pub fn summary_at(&self, now: DateTime<Utc>) -> String {
        format!("[{}] {} - {}", format_state(self.state), self.title, self.kind_detail_at(now))
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
