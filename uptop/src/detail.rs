//! Detail pane: which target it is about, and the last loaded payload.

use serde::Serialize;

pub const TITLE_PLACEHOLDER: &str = "—";
pub const PICK_ACTION_PROMPT: &str = "Pick an action: Load checks (c) / Load uptime (u).";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub output: String,
}

impl Default for DetailView {
    fn default() -> Self {
        Self {
            title: TITLE_PLACEHOLDER.to_string(),
            output: String::new(),
        }
    }
}

impl DetailView {
    pub fn show_prompt(&mut self, id: i64) {
        self.title = format!("#{id}");
        self.output = PICK_ACTION_PROMPT.to_string();
    }

    pub fn show_json<T: Serialize>(&mut self, value: &T) {
        self.output = serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| format!("<unrenderable payload: {e}>"));
    }

    pub fn blank(&mut self) {
        *self = Self::default();
    }
}
