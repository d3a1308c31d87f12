//! Bottom status line: last outcome, colored by kind.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::status::StatusLine;
use crate::ui::theme::{status_color, status_marker};

pub fn draw_status(f: &mut ratatui::Frame<'_>, area: Rect, status: &StatusLine) {
    if status.text.is_empty() {
        return;
    }
    let color = status_color(status.kind);
    let line = Line::from(vec![
        Span::styled(
            format!("{} ", status_marker(status.kind)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(status.text.clone(), Style::default().fg(color)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
