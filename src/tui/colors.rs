//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, State};

// Rows are tinted by computed priority; low priority keeps the terminal default.

/// Used for Urgent
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Used for High
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for Medium
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// Header and status bar background
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

/// Foreground color for a row, by state and computed priority.
pub fn row_color(state: State, priority: Priority) -> Color {
    match (state, priority) {
        (State::Done | State::Cancelled, _) => Color::DarkGray,
        (_, Priority::Urgent) => Color::LightRed,
        (_, Priority::High) => GOLD,
        (_, Priority::Medium) => Color::LightGreen,
        (_, Priority::Low) => Color::White,
    }
}

/// Background used for the priority badge cell.
pub fn priority_badge(priority: Priority) -> Color {
    match priority {
        Priority::Urgent => DARK_RED,
        Priority::High => Color::Rgb(120, 90, 0),
        Priority::Medium => DARK_GREEN,
        Priority::Low => Color::Reset,
    }
}
