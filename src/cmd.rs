use anyhow::{Context, Result};
use chrono::{Days, Duration, Local, Utc};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::console::Console;
use crate::dates::end_of_day;
use crate::fields::*;
use crate::manager::TaskManager;
use crate::menu;
use crate::task::Task;
use crate::tui::run::run_tui;

/// Run the numbered menu on stdin/stdout until the user exits or input closes.
pub fn cmd_menu(manager: &mut TaskManager, plain: bool) -> Result<()> {
    let mut console = Console::stdio(!plain);
    menu::run(manager, &mut console).context("menu session failed")
}

/// Launch the full-screen board on the given view.
pub fn cmd_ui(manager: &mut TaskManager, filter: FilterChoice) -> Result<()> {
    run_tui(manager, filter).context("UI error")
}

/// Print a completion script for `shell` to stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Fill `manager` with one or two tasks of every kind.
pub fn seed_demo(manager: &mut TaskManager) -> Result<()> {
    let today = Local::now().date_naive();
    let now = Utc::now();
    let tax_due = today
        .checked_add_days(Days::new(2))
        .and_then(end_of_day)
        .context("demo due date out of range")?;

    let tasks = [
        Task::new("Buy milk", "Semi-skimmed, two litres", State::Pending, Difficulty::Easy)?,
        Task::new("Refactor billing module", "", State::InProgress, Difficulty::Hard)?,
        Task::new("Pay rent", "", State::Done, Difficulty::Medium)?,
        Task::deadline(
            "File tax return",
            "Gather receipts first",
            State::Pending,
            tax_due,
            Priority::High,
        )?,
        Task::deadline("Renew passport", "", State::Pending, now - Duration::days(3), Priority::Medium)?,
        Task::recurring("Water plants", "", State::Pending, 3)?,
        Task::recurring("Weekly review", "", State::Pending, 7)?.mark_run_at(now - Duration::days(8))?,
    ];

    let count = tasks.len();
    for task in tasks {
        manager.add(task);
    }
    info!(count, "seeded demo tasks");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_demo_covers_every_kind() {
        let mut m = TaskManager::new();
        seed_demo(&mut m).unwrap();

        assert_eq!(m.len(), 7);
        assert!(m.all().iter().any(|t| t.difficulty().is_some()));
        assert!(m.all().iter().any(|t| t.due_at().is_some()));
        assert_eq!(m.all().iter().filter(|t| t.is_recurring()).count(), 2);
        assert_eq!(m.all().iter().filter(|t| t.is_overdue()).count(), 1);

        let review = &m.find_by_title("weekly review")[0];
        assert_eq!(review.state(), State::Done);
        assert_eq!(review.compute_priority(), Priority::High);
    }
}
