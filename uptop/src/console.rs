//! Action dispatcher: the user-facing operations and the shared state they update.
//!
//! Each operation is an independent async task. State is only touched between network
//! awaits, in one short critical section, and every operation ends with its own status
//! write; when several are in flight the last one to finish owns the status line.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::api::{MonitorApi, CHECKS_PAGE_SIZE};
use crate::detail::DetailView;
use crate::error::{ConsoleError, Result};
use crate::form::{parse_hours, TargetForm};
use crate::registry::{RegistryView, RowAction};
use crate::selection::Selection;
use crate::status::StatusLine;

pub const MSG_EMPTY: &str = "No targets yet. Add the first one.";
pub const MSG_SELECT_FIRST: &str = "Select a target first.";

/// Asks the operator a yes/no question before a destructive action.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleState {
    pub selection: Selection,
    pub registry: RegistryView,
    pub detail: DetailView,
    pub status: StatusLine,
}

#[derive(Clone)]
pub struct Console {
    api: MonitorApi,
    confirm: Arc<dyn Confirm>,
    state: Arc<Mutex<ConsoleState>>,
}

impl Console {
    pub fn new(api: MonitorApi, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            api,
            confirm,
            state: Arc::new(Mutex::new(ConsoleState::default())),
        }
    }

    pub fn state(&self) -> &Arc<Mutex<ConsoleState>> {
        &self.state
    }

    pub async fn snapshot(&self) -> ConsoleState {
        self.state.lock().await.clone()
    }

    /// Re-fetch the target list and rebuild the table.
    pub async fn refresh(&self) {
        if let Err(e) = self.reload().await {
            self.fail("refresh", e).await;
        }
    }

    async fn reload(&self) -> Result<()> {
        let targets = self.api.list_targets().await?;
        let mut st = self.state.lock().await;
        st.registry.render(&targets);
        if targets.is_empty() {
            st.status.info(MSG_EMPTY);
        }
        tracing::info!("Registry refreshed: {} targets", targets.len());
        Ok(())
    }

    pub async fn add_target(&self, form: &TargetForm) {
        let draft = match form.validate() {
            Ok(d) => d,
            Err(e) => return self.fail("add target", e).await,
        };

        match self.api.create_target(&draft).await {
            Ok(created) => {
                tracing::info!("Created target #{} ({})", created.id, created.name);
                self.state
                    .lock()
                    .await
                    .status
                    .ok(format!("Target created: id={}", created.id));
                self.refresh().await;
            }
            Err(e) => self.fail("create target", e).await,
        }
    }

    pub async fn delete_target(&self, id: i64) {
        let prompt = format!("Delete target #{id}? This will also delete its checks.");
        if !self.confirm.confirm(&prompt).await {
            tracing::debug!("Delete of target #{} declined", id);
            self.state
                .lock()
                .await
                .status
                .info(format!("Delete of target #{id} cancelled."));
            return;
        }

        match self.api.delete_target(id).await {
            Ok(()) => {
                tracing::info!("Deleted target #{}", id);
                {
                    let mut st = self.state.lock().await;
                    if st.selection.is_selected(id) {
                        st.selection.clear();
                        st.detail.blank();
                    }
                    st.status.ok(format!("Deleted target #{id}"));
                }
                self.refresh().await;
            }
            Err(e) => self.fail("delete target", e).await,
        }
    }

    pub async fn select_target(&self, id: i64) {
        tracing::info!("Selected target #{}", id);
        let mut st = self.state.lock().await;
        st.selection.set(id);
        st.detail.show_prompt(id);
        st.status.info(format!("Selected target #{id}"));
    }

    pub async fn dispatch(&self, action: RowAction) {
        match action {
            RowAction::Select(id) => self.select_target(id).await,
            RowAction::Delete(id) => self.delete_target(id).await,
        }
    }

    pub async fn load_checks(&self) {
        let id = match self.require_selection().await {
            Ok(id) => id,
            Err(e) => return self.fail("load checks", e).await,
        };

        match self.api.checks(id, CHECKS_PAGE_SIZE).await {
            Ok(checks) => {
                tracing::info!("Loaded {} checks for target #{}", checks.len(), id);
                let mut st = self.state.lock().await;
                if st.selection.is_selected(id) {
                    st.detail.show_json(&checks);
                    st.status
                        .ok(format!("Loaded {} checks for target #{id}", checks.len()));
                } else {
                    st.status.info(format!(
                        "Checks for target #{id} arrived after the selection changed; not shown."
                    ));
                }
            }
            Err(e) => self.fail("load checks", e).await,
        }
    }

    pub async fn load_uptime(&self, hours_input: &str) {
        let id = match self.require_selection().await {
            Ok(id) => id,
            Err(e) => return self.fail("load uptime", e).await,
        };
        let hours = parse_hours(hours_input);

        match self.api.uptime(id, hours).await {
            Ok(uptime) => {
                tracing::info!("Loaded uptime for target #{} ({}h)", id, hours);
                let mut st = self.state.lock().await;
                if st.selection.is_selected(id) {
                    st.detail.show_json(&uptime);
                    st.status
                        .ok(format!("Loaded uptime for target #{id} ({hours}h)"));
                } else {
                    st.status.info(format!(
                        "Uptime for target #{id} arrived after the selection changed; not shown."
                    ));
                }
            }
            Err(e) => self.fail("load uptime", e).await,
        }
    }

    async fn require_selection(&self) -> Result<i64> {
        self.state
            .lock()
            .await
            .selection
            .get()
            .ok_or_else(|| ConsoleError::validation(MSG_SELECT_FIRST))
    }

    async fn fail(&self, op: &str, e: ConsoleError) {
        tracing::warn!("{} failed: {}", op, e);
        self.state.lock().await.status.err(e.to_string());
    }
}
