//! Alert rule rows (`alerts`).

use dashguard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertRow {
    pub id: DbId,
    pub org_id: DbId,
    pub dashboard_id: DbId,
    pub panel_id: i64,
    pub name: String,
    pub message: String,
    pub frequency_secs: i64,
    pub settings: serde_json::Value,
    pub updated_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
