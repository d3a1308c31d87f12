//! Typed calls for the monitoring API endpoints.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::transport::{RequestOptions, Transport};
use crate::types::{NewTarget, Target};

/// Page size used when loading a target's check history.
pub const CHECKS_PAGE_SIZE: u32 = 20;

/// Uptime window used when the hours field is empty or unusable.
pub const DEFAULT_UPTIME_HOURS: i64 = 24;

#[derive(Clone)]
pub struct MonitorApi {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for MonitorApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorApi").finish_non_exhaustive()
    }
}

impl MonitorApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// GET /targets
    pub async fn list_targets(&self) -> Result<Vec<Target>> {
        let v = self.transport.request("/targets", RequestOptions::get()).await?;
        decode(v)
    }

    /// POST /targets, returns the stored record with its new id
    pub async fn create_target(&self, draft: &NewTarget) -> Result<Target> {
        let body = serde_json::to_value(draft)?;
        let v = self
            .transport
            .request("/targets", RequestOptions::post(body))
            .await?;
        decode(v)
    }

    /// DELETE /targets/{id}; the server drops the target's checks with it.
    pub async fn delete_target(&self, id: i64) -> Result<()> {
        self.transport
            .request(&format!("/targets/{id}"), RequestOptions::delete())
            .await?;
        Ok(())
    }

    /// GET /targets/{id}/checks?limit={n}
    pub async fn checks(&self, id: i64, limit: u32) -> Result<Vec<Value>> {
        let v = self
            .transport
            .request(
                &format!("/targets/{id}/checks?limit={limit}"),
                RequestOptions::get(),
            )
            .await?;
        decode(v)
    }

    /// GET /targets/{id}/uptime?hours={h}
    pub async fn uptime(&self, id: i64, hours: i64) -> Result<Value> {
        self.transport
            .request(
                &format!("/targets/{id}/uptime?hours={hours}"),
                RequestOptions::get(),
            )
            .await
    }
}

fn decode<T: DeserializeOwned>(v: Value) -> Result<T> {
    Ok(serde_json::from_value(v)?)
}
