//! Top header with API endpoint, current selection and last refresh time.

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

use crate::console::ConsoleState;
use crate::ui::util::truncate_middle;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, api_url: &str, st: &ConsoleState) {
    let selected = st
        .selection
        .get()
        .map(|id| format!("#{id}"))
        .unwrap_or_else(|| "none".into());
    let refreshed = st
        .registry
        .refreshed_at()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "loading...".into());
    let title = format!(
        "uptop | api: {} | targets: {} | selected: {} | refreshed: {}  (a add, r refresh, c checks, u uptime, h hours, q quit)",
        truncate_middle(api_url, 40),
        st.registry.len(),
        selected,
        refreshed
    );
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
