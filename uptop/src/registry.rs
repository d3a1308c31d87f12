//! Target registry view: rendered rows and the per-row action bindings.
//!
//! Every `render` tears the previous rows and bindings down and builds them again
//! from the fetched list, so a row never carries more than one binding per action.

use chrono::{DateTime, Local};

use crate::types::Target;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Select,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Select(i64),
    Delete(i64),
}

impl RowAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            RowAction::Select(_) => ActionKind::Select,
            RowAction::Delete(_) => ActionKind::Delete,
        }
    }
}

/// One action button on one table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBinding {
    pub row: usize,
    pub action: RowAction,
}

/// Display cells for one target, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRow {
    pub id: i64,
    pub cells: [String; 5],
}

pub const COLUMNS: [&str; 5] = ["ID", "Name", "Type", "Target", "Port"];

pub fn render_row(t: &Target) -> TargetRow {
    TargetRow {
        id: t.id,
        cells: [
            t.id.to_string(),
            t.name.clone(),
            t.kind.to_string(),
            t.target.clone(),
            t.port.map(|p| p.to_string()).unwrap_or_default(),
        ],
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistryView {
    rows: Vec<TargetRow>,
    bindings: Vec<RowBinding>,
    refreshed_at: Option<DateTime<Local>>,
}

impl RegistryView {
    /// Replace the table and its bindings with `targets`.
    pub fn render(&mut self, targets: &[Target]) {
        self.rows = targets.iter().map(render_row).collect();
        self.bindings = self
            .rows
            .iter()
            .enumerate()
            .flat_map(|(row, r)| {
                [
                    RowBinding {
                        row,
                        action: RowAction::Select(r.id),
                    },
                    RowBinding {
                        row,
                        action: RowAction::Delete(r.id),
                    },
                ]
            })
            .collect();
        self.refreshed_at = Some(Local::now());
    }

    pub fn rows(&self) -> &[TargetRow] {
        &self.rows
    }

    pub fn bindings(&self) -> &[RowBinding] {
        &self.bindings
    }

    pub fn binding(&self, row: usize, kind: ActionKind) -> Option<RowAction> {
        self.bindings
            .iter()
            .find(|b| b.row == row && b.action.kind() == kind)
            .map(|b| b.action)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Local>> {
        self.refreshed_at
    }
}
