//! Version history rows (`dashboard_versions`).

use dashguard_core::types::{DbId, Timestamp, Version};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `dashboard_versions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardVersion {
    pub id: DbId,
    pub dashboard_id: DbId,
    /// Version the dashboard carried before this commit; `0` on create.
    pub parent_version: Version,
    pub version: Version,
    pub message: String,
    pub data: serde_json::Value,
    pub created_by: DbId,
    pub created_at: Timestamp,
}
