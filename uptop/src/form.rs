//! Add-target form contents and the input parsing rules for create and uptime.

use crate::api::DEFAULT_UPTIME_HOURS;
use crate::error::{ConsoleError, Result};
use crate::types::{NewTarget, TargetKind};

pub const MSG_REQUIRED: &str = "Fill in name + type + target.";
pub const MSG_TCP_PORT: &str = "TCP requires a port.";
pub const MSG_BAD_PORT: &str = "Port must be an integer between 1 and 65535.";

/// Raw text of the four form inputs, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetForm {
    pub name: String,
    pub kind: String,
    pub target: String,
    pub port: String,
}

impl Default for TargetForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: TargetKind::Http.to_string(),
            target: String::new(),
            port: String::new(),
        }
    }
}

impl TargetForm {
    /// Check the inputs in order and build the create draft; stops at the first problem.
    pub fn validate(&self) -> Result<NewTarget> {
        let name = self.name.trim();
        let kind = self.kind.trim();
        let target = self.target.trim();
        let port_raw = self.port.trim();

        if name.is_empty() || kind.is_empty() || target.is_empty() {
            return Err(ConsoleError::validation(MSG_REQUIRED));
        }
        let kind: TargetKind = kind.parse().map_err(ConsoleError::Validation)?;

        let port = if kind.requires_port() {
            if port_raw.is_empty() {
                return Err(ConsoleError::validation(MSG_TCP_PORT));
            }
            match port_raw.parse::<u16>() {
                Ok(p) if p > 0 => Some(p),
                _ => return Err(ConsoleError::validation(MSG_BAD_PORT)),
            }
        } else {
            None
        };

        Ok(NewTarget {
            name: name.to_string(),
            kind,
            target: target.to_string(),
            port,
            enabled: true,
        })
    }

    /// Step the kind field through the offered choices.
    pub fn cycle_kind(&mut self, forward: bool) {
        let choices = TargetKind::CHOICES;
        let pos = self
            .kind
            .parse::<TargetKind>()
            .ok()
            .and_then(|k| choices.iter().position(|c| *c == k));
        let next = match (pos, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % choices.len(),
            (Some(i), false) => (i + choices.len() - 1) % choices.len(),
        };
        self.kind = choices[next].to_string();
    }
}

/// Hours window from the uptime input; empty, unparseable or zero means the default.
pub fn parse_hours(input: &str) -> i64 {
    match input.trim().parse::<i64>() {
        Ok(0) | Err(_) => DEFAULT_UPTIME_HOURS,
        Ok(h) => h,
    }
}
