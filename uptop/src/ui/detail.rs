//! Detail pane (title + last payload) and the uptime hours input below it.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::detail::DetailView;
use crate::ui::theme::{FOCUS_FG, MUTED_FG};

pub fn draw_detail(f: &mut ratatui::Frame<'_>, area: Rect, detail: &DetailView, scroll: u16) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Detail {}", detail.title));
    let body = Paragraph::new(detail.output.as_str())
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(body, area);
}

pub fn draw_hours_input(f: &mut ratatui::Frame<'_>, area: Rect, hours: &str, editing: bool) {
    let border = if editing {
        Style::default().fg(FOCUS_FG)
    } else {
        Style::default()
    };
    let value = if hours.is_empty() && !editing {
        Span::styled("24 (default)", Style::default().fg(MUTED_FG))
    } else {
        Span::styled(
            format!("{hours}{}", if editing { "▏" } else { "" }),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };
    let line = Line::from(vec![Span::raw("hours: "), value]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title("Uptime window (h to edit)");
    f.render_widget(Paragraph::new(line).block(block), area);
}
