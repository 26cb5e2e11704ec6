//! Enumerations for TUI state management.

/// Which screen the board is showing.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    TaskList,
    Search,
    Help,
    Confirm,
}
