//! Targets table with per-row [Select] [Delete] action cells, cursor movement and mouse hit-testing.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};

use crate::console::ConsoleState;
use crate::registry::{ActionKind, COLUMNS};
use crate::ui::theme::{HEADER_FG, MUTED_FG, SELECTED_FG};
use crate::ui::util::inner;

pub const ACTIONS_CELL: &str = "[Select] [Delete]";

// Offsets of the two buttons inside ACTIONS_CELL
const SELECT_BUTTON: std::ops::Range<u16> = 0..8;
const DELETE_BUTTON: std::ops::Range<u16> = 9..17;

// Shared by drawing and hit-testing so both agree on column positions.
const COLS: [Constraint; 6] = [
    Constraint::Length(5),      // ID
    Constraint::Percentage(22), // Name
    Constraint::Length(5),      // Type
    Constraint::Min(12),        // Target
    Constraint::Length(6),      // Port
    Constraint::Length(17),     // Actions
];
const COLUMN_SPACING: u16 = 1;

pub fn draw_targets(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    st: &ConsoleState,
    table_state: &mut TableState,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Targets ({})", st.registry.len()));

    if st.registry.is_empty() {
        let hint = Paragraph::new("No targets yet. Press 'a' to add one.")
            .style(Style::default().fg(MUTED_FG))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let header = Row::new(COLUMNS.iter().copied().chain(["Actions"])).style(
        Style::default()
            .fg(HEADER_FG)
            .add_modifier(Modifier::BOLD),
    );

    let rows = st.registry.rows().iter().map(|r| {
        let style = if st.selection.is_selected(r.id) {
            Style::default()
                .fg(SELECTED_FG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut cells: Vec<Cell> = r.cells.iter().map(|c| Cell::from(c.clone())).collect();
        cells.push(Cell::from(ACTIONS_CELL).style(Style::default().fg(MUTED_FG)));
        Row::new(cells).style(style)
    });

    let table = Table::new(rows, COLS)
        .header(header)
        .block(block)
        .column_spacing(COLUMN_SPACING)
        .flex(Flex::Start)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_stateful_widget(table, area, table_state);
}

/// Where a click landed in the table: a data row and, if on a button, which one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableHit {
    pub row: usize,
    pub action: Option<ActionKind>,
}

/// Map a terminal cell to a table row/button, given the table's outer area and scroll offset.
pub fn targets_hit_test(
    area: Rect,
    offset: usize,
    total_rows: usize,
    column: u16,
    row: u16,
) -> Option<TableHit> {
    let inner = inner(area);
    if inner.height < 2 || inner.width == 0 {
        return None;
    }
    // first line is the header
    let first_row_y = inner.y + 1;
    let inside = row >= first_row_y
        && row < inner.y + inner.height
        && column >= inner.x
        && column < inner.x + inner.width;
    if !inside {
        return None;
    }
    let idx = offset + (row - first_row_y) as usize;
    if idx >= total_rows {
        return None;
    }

    let cols = Layout::horizontal(COLS)
        .spacing(COLUMN_SPACING)
        .flex(Flex::Start)
        .split(inner);
    let actions = cols[5];
    let action = if column >= actions.x && column < actions.x + actions.width {
        let rel = column - actions.x;
        if SELECT_BUTTON.contains(&rel) {
            Some(ActionKind::Select)
        } else if DELETE_BUTTON.contains(&rel) {
            Some(ActionKind::Delete)
        } else {
            None
        }
    } else {
        None
    };
    Some(TableHit { row: idx, action })
}

/// Handle keyboard cursor movement (Up/Down/PageUp/PageDown/Home/End)
pub fn targets_handle_key(cursor: &mut usize, key: KeyEvent, page_size: usize, total_rows: usize) {
    let page = page_size.max(1);
    match key.code {
        KeyCode::Up => *cursor = cursor.saturating_sub(1),
        KeyCode::Down => *cursor = cursor.saturating_add(1),
        KeyCode::PageUp => *cursor = cursor.saturating_sub(page),
        KeyCode::PageDown => *cursor = cursor.saturating_add(page),
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = total_rows.saturating_sub(1),
        _ => {}
    }
    clamp_cursor(cursor, total_rows);
}

pub fn clamp_cursor(cursor: &mut usize, total_rows: usize) {
    *cursor = (*cursor).min(total_rows.saturating_sub(1));
}
