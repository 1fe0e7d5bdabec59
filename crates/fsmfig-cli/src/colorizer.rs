//! Terminal colorization for status lines
//!
//! Applies ANSI escape codes to progress messages using crossterm.

use crossterm::style::{Color, Stylize};

/// Kind of status line
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Success,
    Warning,
    Failure,
}

impl Status {
    fn color(self) -> Color {
        match self {
            Status::Success => Color::Green,
            Status::Warning => Color::Yellow,
            Status::Failure => Color::Red,
        }
    }
}

/// Color `text` for its status, or return it unchanged when disabled
pub fn paint(text: &str, status: Status, enabled: bool) -> String {
    if enabled {
        format!("{}", text.with(status.color()))
    } else {
        text.to_string()
    }
}
