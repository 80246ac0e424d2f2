//! Dashboard and folder rows.

use dashguard_core::dashboard::Dashboard;
use dashguard_core::types::{DbId, Timestamp, Version};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `dashboards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DashboardRow {
    pub id: DbId,
    pub uid: String,
    pub org_id: DbId,
    pub folder_id: DbId,
    pub is_folder: bool,
    pub title: String,
    pub slug: String,
    pub version: Version,
    pub data: Json<Map<String, Value>>,
    pub created_by: DbId,
    pub updated_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DashboardRow> for Dashboard {
    fn from(row: DashboardRow) -> Self {
        Self {
            id: row.id,
            uid: row.uid,
            org_id: row.org_id,
            folder_id: row.folder_id,
            is_folder: row.is_folder,
            title: row.title,
            slug: row.slug,
            version: row.version,
            data: row.data.0,
            created_by: row.created_by,
            updated_by: row.updated_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
