//! Menu-driven console session.
//!
//! The session reads menu choices and field values through a [`Console`], calls the
//! [`TaskManager`] and renders what comes back. Lists are numbered for selection, but a
//! selected entry is always resolved through its [`TaskId`], so a numbered position
//! never points at a different task after the collection changes.
//! Running out of input at any prompt ends the session cleanly.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::console::Console;
use crate::dates::{end_of_day, format_due_relative, format_timestamp, parse_due_input};
use crate::error::TaskError;
use crate::fields::*;
use crate::filter;
use crate::manager::{Stats, TaskManager};
use crate::task::{Task, TaskId, TaskKind};

const STATE_MENU: &str = "State: [1] Pending - [2] In progress - [3] Done - [4] Cancelled";
const DIFFICULTY_MENU: &str = "Difficulty: [1] Hard - [2] Medium - [3] Easy";
const PRIORITY_MENU: &str = "Priority: [1] Low - [2] Medium - [3] High - [4] Urgent";
const KIND_MENU: &str = "Kind: [1] Basic - [2] Deadline - [3] Recurring";
const DUE_HINT: &str = "Due date (YYYY-MM-DD, today, tomorrow, friday, in 3d, eow): ";

#[derive(Clone, Copy)]
enum KindChoice {
    Basic,
    Deadline,
    Recurring,
}

impl KindChoice {
    fn from_choice(choice: u32) -> Option<KindChoice> {
        match choice {
            1 => Some(KindChoice::Basic),
            2 => Some(KindChoice::Deadline),
            3 => Some(KindChoice::Recurring),
            _ => None,
        }
    }
}

/// Kind-specific values collected while adding a task.
enum KindDraft {
    Basic(Difficulty),
    Deadline(DateTime<Utc>, Priority),
    Recurring(u32),
}

impl KindDraft {
    fn build(&self, title: &str, description: &str, state: State) -> Result<Task, TaskError> {
        match *self {
            KindDraft::Basic(difficulty) => Task::new(title, description, state, difficulty),
            KindDraft::Deadline(due_at, priority) => Task::deadline(title, description, state, due_at, priority),
            KindDraft::Recurring(interval_days) => Task::recurring(title, description, state, interval_days),
        }
    }
}

#[derive(Serialize)]
struct Snapshot<'a> {
    stats: Stats,
    tasks: &'a [Task],
}

/// Run the interactive menu until the user exits or input runs out.
pub fn run<R: BufRead, W: Write>(manager: &mut TaskManager, console: &mut Console<R, W>) -> io::Result<()> {
    let mut session = Session { manager, console };
    match session.main_loop() {
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            debug!("input closed, leaving menu");
            Ok(())
        }
        other => other,
    }
}

struct Session<'a, R, W: Write> {
    manager: &'a mut TaskManager,
    console: &'a mut Console<R, W>,
}

impl<R: BufRead, W: Write> Session<'_, R, W> {
    fn main_loop(&mut self) -> io::Result<()> {
        loop {
            self.console.clear()?;
            self.console.blank()?;
            self.console.line("TASKDECK")?;
            self.console.line("----------- MENU -----------")?;
            self.console.line("[1] View tasks...")?;
            self.console.line("[2] Search tasks...")?;
            self.console.line("[3] Add task")?;
            self.console.line("[4] Statistics...")?;
            self.console.line("[5] Purge completed tasks")?;
            self.console.line("[6] Export snapshot (JSON)")?;
            self.console.line("[0] Exit")?;

            let choice = self.console.prompt("Option: ")?;
            match choice.trim() {
                "0" => {
                    self.console.blank()?;
                    self.console.line("Thanks for using taskdeck. See you next time!")?;
                    return Ok(());
                }
                "1" => self.view_tasks()?,
                "2" => self.search_tasks()?,
                "3" => self.add_task()?,
                "4" => self.show_stats()?,
                "5" => self.purge_completed()?,
                "6" => self.export_snapshot()?,
                _ => {
                    self.console.line("Invalid option!")?;
                    self.console.pause()?;
                }
            }
        }
    }

    fn view_tasks(&mut self) -> io::Result<()> {
        loop {
            self.console.clear()?;
            self.console.line("VIEW TASKS")?;
            self.console.blank()?;
            self.console.line("[1] All")?;
            self.console.line("[2] Pending")?;
            self.console.line("[3] In progress")?;
            self.console.line("[4] Done")?;
            self.console.line("[5] Cancelled")?;
            self.console.line("[6] Overdue")?;
            self.console.line("[7] Recurring")?;
            self.console.line("[8] By priority")?;
            self.console.line("[0] Back to menu")?;

            let choice = self.console.prompt("Option: ")?;
            let picked = match choice.trim() {
                "0" => return Ok(()),
                "1" => FilterChoice::All,
                "2" => FilterChoice::Pending,
                "3" => FilterChoice::InProgress,
                "4" => FilterChoice::Done,
                "5" => FilterChoice::Cancelled,
                "6" => FilterChoice::Overdue,
                "7" => FilterChoice::Recurring,
                "8" => {
                    let priority = self.choose(PRIORITY_MENU, Priority::from_choice)?;
                    self.manager.set_filter(filter::by_priority(priority));
                    let heading = format!("{} PRIORITY TASKS", format_priority(priority).to_uppercase());
                    self.list_filtered(&heading)?;
                    continue;
                }
                _ => {
                    self.console.line("Invalid option!")?;
                    self.console.pause()?;
                    continue;
                }
            };
            self.manager.set_filter(picked.into_filter());
            let heading = format!("{} TASKS", format_filter(picked).to_uppercase());
            self.list_filtered(&heading)?;
        }
    }

    fn list_filtered(&mut self, heading: &str) -> io::Result<()> {
        let ids: Vec<TaskId> = self.manager.filter_with_current().iter().map(|t| t.id()).collect();
        self.console.clear()?;
        self.pick_from(heading, &ids)
    }

    /// Show a numbered list and open the details of the entry the user picks.
    fn pick_from(&mut self, heading: &str, ids: &[TaskId]) -> io::Result<()> {
        self.console.line(heading)?;
        self.console.blank()?;
        if ids.is_empty() {
            self.console.line("No tasks found!")?;
            return self.console.pause();
        }

        for (n, id) in ids.iter().enumerate() {
            if let Some(task) = self.manager.get(*id) {
                self.console.line(format!("[{}] {}", n + 1, task))?;
            }
        }
        self.console.blank()?;
        self.console.line("Enter a task number to see its details - [0] to go back:")?;

        let selection = self.console.prompt("Option: ")?;
        match selection.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= ids.len() => self.show_details(ids[n - 1]),
            _ => Ok(()),
        }
    }

    fn show_details(&mut self, id: TaskId) -> io::Result<()> {
        let Some(task) = self.manager.get(id).cloned() else {
            self.console.line("No details found")?;
            return self.console.pause();
        };

        self.console.blank()?;
        self.console.line("---------- TASK DETAILS ----------")?;
        self.console.line(format!("Id:           {}", task.id().short()))?;
        self.console.line(format!("Title:        {}", task.title()))?;
        self.console.line(format!("Description:  {}", task.description()))?;
        self.console.line(format!("State:        {}", format_state(task.state())))?;
        self.console.line(format!("Kind:         {}", task.kind().label()))?;
        match task.kind() {
            TaskKind::Basic { difficulty } => {
                self.console.line(format!("Difficulty:   {}", format_difficulty(*difficulty)))?;
            }
            TaskKind::Deadline { due_at, priority } => {
                let today = Local::now().date_naive();
                self.console.line(format!(
                    "Due:          {} ({})",
                    format_timestamp(*due_at),
                    format_due_relative(*due_at, today)
                ))?;
                self.console.line(format!("Assigned:     {}", format_priority(*priority)))?;
                if task.is_overdue() {
                    self.console.line("              OVERDUE")?;
                }
            }
            TaskKind::Recurring { interval_days, last_run_at } => {
                self.console.line(format!("Every:        {} day(s)", interval_days))?;
                self.console.line(format!("Last run:     {}", format_timestamp(*last_run_at)))?;
            }
        }
        self.console.line(format!("Priority:     {}", format_priority(task.compute_priority())))?;
        self.console.line(format!(
            "Created:      {} ({}d ago)",
            format_timestamp(task.created_at()),
            task.days_since_creation()
        ))?;
        self.console.line(format!("Last edited:  {}", format_timestamp(task.last_edited_at())))?;
        self.console.line("----------------------------------")?;
        self.console.blank()?;

        let options = if task.is_recurring() {
            "[E] Edit - [D] Delete - [R] Mark run - [X] Reset - [0] Back: "
        } else {
            "[E] Edit - [D] Delete - [0] Back: "
        };
        let choice = self.console.prompt(options)?.trim().to_lowercase();
        match choice.as_str() {
            "e" => {
                self.console.clear()?;
                self.edit_task(task)
            }
            "d" => self.delete_task(&task),
            "r" if task.is_recurring() => self.store(task.mark_run(), "Run recorded."),
            "x" if task.is_recurring() => self.store(task.reset(), "Task reset to pending."),
            _ => Ok(()),
        }
    }

    /// Write back the result of a task transition, or report why it was rejected.
    fn store(&mut self, result: Result<Task, TaskError>, done: &str) -> io::Result<()> {
        match result {
            Ok(task) => {
                let id = task.id();
                if self.manager.update(id, task) {
                    debug!(%id, "task updated from menu");
                    self.console.line(done)?;
                } else {
                    self.console.line("That task no longer exists.")?;
                }
            }
            Err(e) => self.console.line(format!("Error: {e}"))?,
        }
        self.console.pause()
    }

    fn delete_task(&mut self, task: &Task) -> io::Result<()> {
        let answer = self.console.prompt(&format!("Delete \"{}\"? [y/N]: ", task.title()))?;
        if answer.trim().eq_ignore_ascii_case("y") {
            if self.manager.remove(task.id()) {
                info!(id = %task.id(), "task deleted from menu");
                self.console.line("Task deleted.")?;
            } else {
                self.console.line("That task no longer exists.")?;
            }
            return self.console.pause();
        }
        Ok(())
    }

    fn edit_task(&mut self, mut task: Task) -> io::Result<()> {
        self.console.line("=== EDIT TASK ===")?;
        self.console.blank()?;

        self.console.line(format!("Title: {}", task.title()))?;
        if self.wants_to_edit("title")? {
            loop {
                let title = self.console.prompt("New title: ")?;
                match task.with_title(&title) {
                    Ok(t) => {
                        task = t;
                        self.console.line("Title updated.")?;
                        break;
                    }
                    Err(e) => self.console.line(format!("Error: {e}"))?,
                }
            }
        }

        self.console.blank()?;
        self.console.line(format!("Description: {}", task.description()))?;
        if self.wants_to_edit("description")? {
            let description = self.console.prompt("New description: ")?;
            task = task.with_description(&description);
            self.console.line("Description updated.")?;
        }

        self.console.blank()?;
        self.console.line(format!("State: {}", format_state(task.state())))?;
        if self.wants_to_edit("state")? {
            let state = self.choose(STATE_MENU, State::from_choice)?;
            task = task.with_state(state);
            self.console.line("State updated.")?;
        }

        match task.kind().clone() {
            TaskKind::Basic { difficulty } => {
                self.console.blank()?;
                self.console.line(format!("Difficulty: {}", format_difficulty(difficulty)))?;
                if self.wants_to_edit("difficulty")? {
                    let difficulty = self.choose(DIFFICULTY_MENU, Difficulty::from_choice)?;
                    self.replace(&mut task, |t| t.with_difficulty(difficulty), "Difficulty")?;
                }
            }
            TaskKind::Deadline { due_at, priority } => {
                self.console.blank()?;
                self.console.line(format!("Due: {}", format_timestamp(due_at)))?;
                if self.wants_to_edit("due date")? {
                    let due_at = self.read_due_date()?;
                    self.replace(&mut task, |t| t.with_due_at(due_at), "Due date")?;
                }
                self.console.blank()?;
                self.console.line(format!("Priority: {}", format_priority(priority)))?;
                if self.wants_to_edit("priority")? {
                    let priority = self.choose(PRIORITY_MENU, Priority::from_choice)?;
                    self.replace(&mut task, |t| t.with_priority(priority), "Priority")?;
                }
            }
            TaskKind::Recurring { interval_days, .. } => {
                self.console.blank()?;
                self.console.line(format!("Every: {} day(s)", interval_days))?;
                if self.wants_to_edit("interval")? {
                    loop {
                        let days = self.read_number("Repeat every (days): ")?;
                        match task.with_interval(days) {
                            Ok(t) => {
                                task = t;
                                self.console.line("Interval updated.")?;
                                break;
                            }
                            Err(e) => self.console.line(format!("Error: {e}"))?,
                        }
                    }
                }
            }
        }

        self.console.blank()?;
        if self.manager.update(task.id(), task) {
            self.console.line("!! TASK UPDATED !!")?;
        } else {
            self.console.line("That task no longer exists.")?;
        }
        self.console.pause()
    }

    fn replace(
        &mut self,
        task: &mut Task,
        edit: impl FnOnce(&Task) -> Result<Task, TaskError>,
        field: &str,
    ) -> io::Result<()> {
        match edit(task) {
            Ok(t) => {
                *task = t;
                self.console.line(format!("{field} updated."))
            }
            Err(e) => self.console.line(format!("Error: {e}")),
        }
    }

    fn search_tasks(&mut self) -> io::Result<()> {
        self.console.clear()?;
        self.console.line("SEARCH TASKS")?;
        self.console.blank()?;
        self.console.line("Enter (part of) a title to search for:")?;
        let query = self.console.prompt("Title: ")?;

        let ids: Vec<TaskId> = self.manager.find_by_title(&query).iter().map(|t| t.id()).collect();
        self.console.blank()?;
        self.pick_from("TASKS FOUND", &ids)
    }

    fn add_task(&mut self) -> io::Result<()> {
        self.console.clear()?;
        self.console.line("ADD TASK")?;
        self.console.blank()?;
        self.console.line("Enter the following details:")?;
        self.console.blank()?;

        let mut title = self.console.prompt("Title: ")?;
        let description = self.console.prompt("Description: ")?;
        let state = self.choose(STATE_MENU, State::from_choice)?;
        let mut draft = match self.choose(KIND_MENU, KindChoice::from_choice)? {
            KindChoice::Basic => KindDraft::Basic(self.choose(DIFFICULTY_MENU, Difficulty::from_choice)?),
            KindChoice::Deadline => {
                let due_at = self.read_due_date()?;
                KindDraft::Deadline(due_at, self.choose(PRIORITY_MENU, Priority::from_choice)?)
            }
            KindChoice::Recurring => KindDraft::Recurring(self.read_number("Repeat every (days): ")?),
        };

        let task = loop {
            match draft.build(&title, &description, state) {
                Ok(task) => break task,
                Err(e @ TaskError::EmptyTitle) => {
                    self.console.line(format!("Error: {e}"))?;
                    title = self.console.prompt("Title: ")?;
                }
                Err(e @ TaskError::NonPositiveInterval) => {
                    self.console.line(format!("Error: {e}"))?;
                    draft = KindDraft::Recurring(self.read_number("Repeat every (days): ")?);
                }
                Err(e) => {
                    self.console.line(format!("Error: {e}"))?;
                    return self.console.pause();
                }
            }
        };

        let id = self.manager.add(task);
        info!(%id, "task created from menu");
        self.console.blank()?;
        self.console.line("!! TASK ADDED !!")?;
        self.console.pause()
    }

    fn show_stats(&mut self) -> io::Result<()> {
        let stats = self.manager.stats();
        let overdue = filter::overdue()(self.manager.all()).len();

        self.console.clear()?;
        self.console.line("STATISTICS")?;
        self.console.blank()?;
        self.console.line(format!("{:<17}{}", "Total tasks:", stats.total))?;
        self.console.line(format!("{:<17}{}", "Pending:", stats.pending))?;
        self.console.line(format!("{:<17}{}", "In progress:", stats.in_progress))?;
        self.console.line(format!("{:<17}{}", "Done:", stats.done))?;
        self.console.line(format!("{:<17}{}", "Cancelled:", stats.cancelled))?;
        self.console.line(format!("{:<17}{}", "Overdue:", overdue))?;
        self.console.pause()
    }

    fn purge_completed(&mut self) -> io::Result<()> {
        let removed = self.manager.purge_completed();
        info!(removed, "purged completed tasks from menu");
        self.console.blank()?;
        self.console.line(format!("Removed {} completed task(s).", removed))?;
        self.console.pause()
    }

    fn export_snapshot(&mut self) -> io::Result<()> {
        let snapshot = Snapshot {
            stats: self.manager.stats(),
            tasks: self.manager.all(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        self.console.clear()?;
        self.console.line(json)?;
        self.console.pause()
    }

    fn wants_to_edit(&mut self, field: &str) -> io::Result<bool> {
        let answer = self.console.prompt(&format!("Edit the {field}? [1] Yes - [Enter] No: "))?;
        Ok(answer.trim() == "1")
    }

    /// Re-prompt until the answer maps onto one of the listed options.
    fn choose<T>(&mut self, menu: &str, pick: impl Fn(u32) -> Option<T>) -> io::Result<T> {
        loop {
            self.console.line(menu)?;
            let raw = self.console.prompt("Option: ")?;
            if let Some(value) = raw.trim().parse::<u32>().ok().and_then(&pick) {
                return Ok(value);
            }
            self.console.line("Invalid option!")?;
        }
    }

    fn read_number(&mut self, label: &str) -> io::Result<u32> {
        loop {
            let raw = self.console.prompt(label)?;
            match raw.trim().parse::<u32>() {
                Ok(n) => return Ok(n),
                Err(_) => self.console.line("Please enter a whole number.")?,
            }
        }
    }

    fn read_due_date(&mut self) -> io::Result<DateTime<Utc>> {
        loop {
            let raw = self.console.prompt(DUE_HINT)?;
            match parse_due_input(&raw).and_then(end_of_day) {
                Some(due_at) => return Ok(due_at),
                None => self.console.line("Could not understand that date.")?,
            }
        }
    }
}
