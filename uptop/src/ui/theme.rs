//! Shared UI theme constants.

use ratatui::style::Color;

use crate::status::StatusKind;

// Status line colors
pub const STATUS_OK: Color = Color::Rgb(10, 170, 10);
pub const STATUS_ERR: Color = Color::Rgb(220, 40, 40);
pub const STATUS_INFO: Color = Color::Rgb(170, 170, 180);

pub const HEADER_FG: Color = Color::Cyan;
pub const SELECTED_FG: Color = Color::Yellow;
pub const FOCUS_FG: Color = Color::Yellow;
pub const MUTED_FG: Color = Color::DarkGray;

pub fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Ok => STATUS_OK,
        StatusKind::Err => STATUS_ERR,
        StatusKind::Info => STATUS_INFO,
    }
}

pub fn status_marker(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Ok => "✔",
        StatusKind::Err => "✖",
        StatusKind::Info => "•",
    }
}
