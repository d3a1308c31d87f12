//! Centered popups: the add-target form and the delete confirmation.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::form::TargetForm;
use crate::ui::theme::{FOCUS_FG, HEADER_FG, MUTED_FG, STATUS_ERR};
use crate::ui::util::centered_rect;

/// Field order in the add form.
pub const FORM_FIELDS: [&str; 4] = ["Name", "Type", "Target", "Port"];
pub const KIND_FIELD: usize = 1;

pub fn form_field_mut(form: &mut TargetForm, field: usize) -> Option<&mut String> {
    match field {
        0 => Some(&mut form.name),
        2 => Some(&mut form.target),
        3 => Some(&mut form.port),
        _ => None,
    }
}

pub fn draw_add_form(f: &mut ratatui::Frame<'_>, area: Rect, form: &TargetForm, focus: usize) {
    let area = centered_rect(60, 40, area);
    let values = [&form.name, &form.kind, &form.target, &form.port];

    let mut lines: Vec<Line> = Vec::with_capacity(FORM_FIELDS.len() + 2);
    for (i, (label, value)) in FORM_FIELDS.iter().zip(values).enumerate() {
        let focused = i == focus;
        let label_style = if focused {
            Style::default().fg(FOCUS_FG).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(HEADER_FG)
        };
        let shown = if i == KIND_FIELD {
            format!("< {value} >")
        } else if focused {
            format!("{value}▏")
        } else {
            value.to_string()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:<8}"), label_style),
            Span::raw(shown),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab/↑↓ field · ←/→ type · Enter create · Esc close (keeps input)",
        Style::default().fg(MUTED_FG),
    )));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Add target"),
        ),
        area,
    );
}

pub fn draw_confirm(f: &mut ratatui::Frame<'_>, area: Rect, prompt: &str) {
    let area = centered_rect(50, 25, area);
    let lines = vec![
        Line::from(prompt.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] ", Style::default().fg(STATUS_ERR).add_modifier(Modifier::BOLD)),
            Span::raw("Yes    "),
            Span::styled("[n] ", Style::default().fg(HEADER_FG).add_modifier(Modifier::BOLD)),
            Span::raw("No"),
        ]),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Confirm")),
        area,
    );
}
