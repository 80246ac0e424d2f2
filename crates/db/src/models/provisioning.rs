//! Provisioning records (`dashboard_provisioning`).

use dashguard_core::dashboard::DashboardProvisioning;
use dashguard_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `dashboard_provisioning` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProvisioningRow {
    pub id: DbId,
    pub dashboard_id: DbId,
    pub name: String,
    pub external_id: String,
    pub updated: i64,
}

impl From<ProvisioningRow> for DashboardProvisioning {
    fn from(row: ProvisioningRow) -> Self {
        Self {
            id: row.id,
            dashboard_id: row.dashboard_id,
            name: row.name,
            external_id: row.external_id,
            updated: row.updated,
        }
    }
}
