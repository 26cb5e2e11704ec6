//! Main application logic for the full-screen task board.
//!
//! The `App` renders the manager's tasks through the currently installed filter,
//! optionally narrowed by a title search, and maps key presses onto manager operations.
//! Rows are tracked by [`TaskId`] so the selection survives deletions and purges.

use std::collections::HashSet;
use std::io;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::dates::format_due_relative;
use crate::fields::*;
use crate::manager::TaskManager;
use crate::task::{Task, TaskId, TaskKind};
use crate::tui::{
    colors::{priority_badge, row_color, DARK_PURPLE},
    enums::AppState,
    input::InputField,
    utils::centered_rect,
};

const FILTER_KEYS: [(char, FilterChoice); 7] = [
    ('1', FilterChoice::All),
    ('2', FilterChoice::Pending),
    ('3', FilterChoice::InProgress),
    ('4', FilterChoice::Done),
    ('5', FilterChoice::Cancelled),
    ('6', FilterChoice::Overdue),
    ('7', FilterChoice::Recurring),
];

/// State of the full-screen board.
pub struct App<'a> {
    state: AppState,
    manager: &'a mut TaskManager,
    table_state: TableState,
    visible: Vec<TaskId>,
    filter_choice: FilterChoice,
    search: InputField,
    search_query: String,
    show_stats: bool,
    status_message: String,
    pending_delete: Option<TaskId>,
}

impl<'a> App<'a> {
    pub fn new(manager: &'a mut TaskManager, filter: FilterChoice) -> Self {
        manager.set_filter(filter.into_filter());
        let mut app = App {
            state: AppState::TaskList,
            manager,
            table_state: TableState::default(),
            visible: Vec::new(),
            filter_choice: filter,
            search: InputField::new(),
            search_query: String::new(),
            show_stats: false,
            status_message: String::new(),
            pending_delete: None,
        };
        app.refresh_visible();
        app
    }

    /// Recompute the visible rows, keeping the selection on the same task when possible.
    fn refresh_visible(&mut self) {
        let selected = self.selected_id();
        let matches: HashSet<TaskId> = self
            .manager
            .find_by_title(&self.search_query)
            .iter()
            .map(|t| t.id())
            .collect();
        self.visible = self
            .manager
            .filter_with_current()
            .iter()
            .map(|t| t.id())
            .filter(|id| matches.contains(id))
            .collect();

        let index = selected
            .and_then(|id| self.visible.iter().position(|v| *v == id))
            .or_else(|| {
                let previous = self.table_state.selected().unwrap_or(0);
                (!self.visible.is_empty()).then(|| previous.min(self.visible.len() - 1))
            });
        self.table_state.select(index);
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.table_state.selected().and_then(|i| self.visible.get(i).copied())
    }

    fn selected_task(&self) -> Option<&Task> {
        self.selected_id().and_then(|id| self.manager.get(id))
    }

    fn set_filter(&mut self, choice: FilterChoice) {
        self.filter_choice = choice;
        self.manager.set_filter(choice.into_filter());
        debug!(filter = format_filter(choice), "board filter changed");
        self.refresh_visible();
    }

    fn move_selection(&mut self, forward: bool) {
        if self.visible.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if forward {
            (current + 1).min(self.visible.len() - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    /// Replace the selected task with the result of `edit`, reporting rejections in the status bar.
    fn edit_selected<F>(&mut self, edit: F, done: &str)
    where
        F: FnOnce(&Task) -> Result<Task, crate::error::TaskError>,
    {
        let Some(id) = self.selected_id() else {
            self.status_message = "No task selected".to_string();
            return;
        };
        let stored = match self.manager.get(id).map(edit) {
            Some(Ok(updated)) => self.manager.update(id, updated),
            Some(Err(e)) => {
                self.status_message = format!("Error: {e}");
                self.refresh_visible();
                return;
            }
            None => false,
        };
        self.status_message = if stored {
            done.to_string()
        } else {
            "That task no longer exists".to_string()
        };
        self.refresh_visible();
    }

    fn handle_task_list_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Char(c @ '1'..='7') => {
                if let Some((_, choice)) = FILTER_KEYS.iter().find(|(k, _)| *k == c) {
                    self.set_filter(*choice);
                }
            }
            KeyCode::Char('/') => {
                self.search = InputField::with_value(&self.search_query);
                self.state = AppState::Search;
            }
            KeyCode::Char(' ') => self.edit_selected(|t| Ok(t.with_state(t.state().next())), "State changed"),
            KeyCode::Char('r') => self.edit_selected(Task::mark_run, "Run recorded"),
            KeyCode::Char('x') => self.edit_selected(Task::reset, "Task reset to pending"),
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    self.pending_delete = Some(id);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('p') => {
                let removed = self.manager.purge_completed();
                self.status_message = format!("Removed {} completed task(s)", removed);
                self.refresh_visible();
            }
            KeyCode::Char('s') => self.show_stats = !self.show_stats,
            KeyCode::Char('h') | KeyCode::Char('?') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_search_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                self.search_query = self.search.value.clone();
                self.state = AppState::TaskList;
                self.refresh_visible();
            }
            KeyCode::Esc => {
                self.search = InputField::new();
                self.search_query.clear();
                self.state = AppState::TaskList;
                self.refresh_visible();
            }
            KeyCode::Backspace => self.search.handle_backspace(),
            KeyCode::Delete => self.search.handle_delete(),
            KeyCode::Left => self.search.move_cursor_left(),
            KeyCode::Right => self.search.move_cursor_right(),
            KeyCode::Char(c) => self.search.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(id) = self.pending_delete.take() {
                    if self.manager.remove(id) {
                        self.status_message = "Task deleted".to_string();
                    }
                }
                self.state = AppState::TaskList;
                self.refresh_visible();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    /// Dispatch one key press. Returns true if the board should close.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        self.status_message.clear();
        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key),
            AppState::Search => self.handle_search_input(key),
            AppState::Confirm => self.handle_confirm_input(key),
            AppState::Help => self.state = AppState::TaskList,
        }
        false
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code));
                }
            }
        }
        Ok(false)
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let search = if self.search_query.is_empty() {
            String::new()
        } else {
            format!("  Search: '{}'", self.search_query)
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled("TASKDECK", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("View: {}{}", format_filter(self.filter_choice), search),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = Local::now().date_naive();
        let header = Row::new(["State", "Kind", "Priority", "Due / Every", "Title"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(DARK_PURPLE).fg(Color::White))
        .height(1);

        let rows: Vec<Row> = self
            .visible
            .iter()
            .filter_map(|id| self.manager.get(*id))
            .map(|task| {
                let priority = task.compute_priority();
                let schedule = match task.kind() {
                    TaskKind::Basic { difficulty } => format_difficulty(*difficulty).to_string(),
                    TaskKind::Deadline { due_at, .. } => format_due_relative(*due_at, today),
                    TaskKind::Recurring { interval_days, .. } => format!("every {}d", interval_days),
                };
                Row::new(vec![
                    Cell::from(format_state(task.state())),
                    Cell::from(task.kind().label()),
                    Cell::from(format_priority(priority)).style(Style::default().bg(priority_badge(priority))),
                    Cell::from(schedule),
                    Cell::from(task.title().to_string()),
                ])
                .style(Style::default().fg(row_color(task.state(), priority)))
            })
            .collect();

        let widths = [
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Length(12),
            Constraint::Min(20),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{}) - Press 'h' for help",
                self.visible.len(),
                self.manager.len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_stats(&self, f: &mut Frame, area: Rect) {
        let stats = self.manager.stats();
        let overdue = self.manager.all().iter().filter(|t| t.is_overdue()).count();
        let text = vec![
            Line::from(format!("Total:        {}", stats.total)),
            Line::from(format!("Pending:      {}", stats.pending)),
            Line::from(format!("In progress:  {}", stats.in_progress)),
            Line::from(format!("Done:         {}", stats.done)),
            Line::from(format!("Cancelled:    {}", stats.cancelled)),
            Line::from(""),
            Line::from(format!("Overdue:      {}", overdue)),
        ];
        let panel = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Statistics"));
        f.render_widget(panel, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Taskdeck Help", bold)),
            Line::from(""),
            Line::from(Span::styled("Navigation:", bold)),
            Line::from("  Up/Down, k/j   Move selection"),
            Line::from("  1..7           View: all, pending, in progress, done, cancelled, overdue, recurring"),
            Line::from("  /              Search by title (Enter to apply, Esc to clear)"),
            Line::from(""),
            Line::from(Span::styled("Actions:", bold)),
            Line::from("  Space          Cycle state (Pending > In Progress > Done > Cancelled)"),
            Line::from("  r              Mark recurring task run"),
            Line::from("  x              Reset recurring task to pending"),
            Line::from("  d              Delete selected task"),
            Line::from("  p              Purge completed tasks"),
            Line::from("  s              Toggle statistics panel"),
            Line::from("  h/?/F1         Show this help"),
            Line::from("  q/Esc          Quit"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help - Press any key to return"))
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect) {
        let title = self
            .pending_delete
            .and_then(|id| self.manager.get(id))
            .map(|t| t.title().to_string())
            .unwrap_or_default();

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled("Delete this task?", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(title),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(Block::default().title("Confirm Action").borders(Borders::ALL))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Search => format!("Search: {} (Enter to apply, Esc to clear)", self.search.value),
                AppState::Confirm => "Confirm Action".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::TaskList => match self.selected_task() {
                    Some(task) => task.summary(),
                    None => format!("Tasks: {} | Press 'h' for help", self.visible.len()),
                },
            }
        };
        let status = Paragraph::new(text).style(Style::default().bg(DARK_PURPLE).fg(Color::White));
        f.render_widget(status, area);
    }

    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        self.render_header(f, chunks[0]);

        if self.state == AppState::Help {
            self.render_help(f, chunks[1]);
        } else {
            let body = if self.show_stats {
                Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(0), Constraint::Length(24)])
                    .split(chunks[1])
            } else {
                Layout::default()
                    .constraints([Constraint::Min(0)])
                    .split(chunks[1])
            };
            self.render_task_list(f, body[0]);
            if self.show_stats {
                self.render_stats(f, body[1]);
            }
            if self.state == AppState::Confirm {
                self.render_confirm(f, chunks[1]);
            }
        }

        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop: render, then handle input, until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ratatui::backend::TestBackend;

    fn seeded() -> TaskManager {
        let mut m = TaskManager::new();
        m.add(Task::new("Buy milk", "", State::Pending, Difficulty::Easy).unwrap());
        m.add(Task::new("Pay rent", "", State::Done, Difficulty::Hard).unwrap());
        m.add(Task::recurring("Water plants", "", State::Pending, 3).unwrap());
        m.add(
            Task::deadline("File taxes", "", State::Pending, Utc::now() - chrono::Duration::days(1), Priority::High)
                .unwrap(),
        );
        m
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_filter_keys_switch_strategy() {
        let mut m = seeded();
        let mut app = App::new(&mut m, FilterChoice::All);
        assert_eq!(app.visible.len(), 4);

        app.handle_key(KeyCode::Char('4'));
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.selected_task().unwrap().title(), "Pay rent");

        app.handle_key(KeyCode::Char('6'));
        assert_eq!(app.selected_task().unwrap().title(), "File taxes");

        app.handle_key(KeyCode::Char('7'));
        assert_eq!(app.selected_task().unwrap().title(), "Water plants");

        app.handle_key(KeyCode::Char('1'));
        assert_eq!(app.visible.len(), 4);
    }

    #[test]
    fn test_search_narrows_and_escape_clears() {
        let mut m = seeded();
        let mut app = App::new(&mut m, FilterChoice::All);

        for key in [KeyCode::Char('/'), KeyCode::Char('I'), KeyCode::Char('L'), KeyCode::Enter] {
            app.handle_key(key);
        }
        let titles: Vec<&str> = app.visible.iter().filter_map(|id| app.manager.get(*id)).map(|t| t.title()).collect();
        assert_eq!(titles, ["Buy milk", "File taxes"]);

        app.handle_key(KeyCode::Char('/'));
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.visible.len(), 4);
    }

    #[test]
    fn test_space_cycles_state_and_keeps_selection() {
        let mut m = seeded();
        let mut app = App::new(&mut m, FilterChoice::All);
        let id = app.selected_id().unwrap();

        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.manager.get(id).unwrap().state(), State::InProgress);
        assert_eq!(app.selected_id(), Some(id));
    }

    #[test]
    fn test_mark_run_only_applies_to_recurring() {
        let mut m = seeded();
        let mut app = App::new(&mut m, FilterChoice::All);

        app.handle_key(KeyCode::Char('r'));
        assert!(app.status_message.starts_with("Error:"));

        app.handle_key(KeyCode::Char('7'));
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.status_message, "Run recorded");
        assert_eq!(app.selected_task().unwrap().state(), State::Done);
    }

    #[test]
    fn test_opens_on_requested_view() {
        let mut m = seeded();
        let app = App::new(&mut m, FilterChoice::Overdue);
        assert_eq!(app.visible.len(), 1);
        assert_eq!(app.selected_task().unwrap().title(), "File taxes");
    }

    #[test]
    fn test_edit_reports_vanished_task() {
        let mut m = seeded();
        let mut app = App::new(&mut m, FilterChoice::All);
        let id = app.selected_id().unwrap();
        assert!(app.manager.remove(id));

        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.status_message, "That task no longer exists");
        assert_eq!(app.manager.len(), 3);
        assert_eq!(app.visible.len(), 3);
        assert!(app.manager.get(id).is_none());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut m = seeded();
        let mut app = App::new(&mut m, FilterChoice::All);

        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.manager.len(), 4);

        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Char('y'));
        assert_eq!(app.manager.len(), 3);
        assert!(app.manager.find_by_title("Buy milk").is_empty());
        assert_eq!(app.visible.len(), 3);
    }

    #[test]
    fn test_purge_and_quit() {
        let mut m = seeded();
        let mut app = App::new(&mut m, FilterChoice::All);

        assert!(!app.handle_key(KeyCode::Char('p')));
        assert_eq!(app.manager.len(), 3);
        assert_eq!(app.status_message, "Removed 1 completed task(s)");
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn test_render_shows_tasks_and_stats() {
        let mut m = seeded();
        let mut app = App::new(&mut m, FilterChoice::All);
        app.handle_key(KeyCode::Char('s'));

        let text = screen(&mut app);
        assert!(text.contains("TASKDECK"));
        assert!(text.contains("Buy milk"));
        assert!(text.contains("Statistics"));
        assert!(text.contains("Tasks (4/4)"));

        app.handle_key(KeyCode::Char('h'));
        assert!(screen(&mut app).contains("Taskdeck Help"));
    }
}
