//! Board TUI entry point and terminal setup.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::fields::FilterChoice;
use crate::manager::TaskManager;
use crate::tui::app::App;

/// Puts the terminal back into cooked mode when dropped, even if the board bails out early.
struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Initialise and run the board over `manager`, opened on `filter`, until the user quits.
pub fn run_tui(manager: &mut TaskManager, filter: FilterChoice) -> io::Result<()> {
    enable_raw_mode()?;
    let guard = RawModeGuard;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = App::new(manager, filter).run(&mut terminal);

    drop(guard);
    terminal.show_cursor()?;
    result
}
