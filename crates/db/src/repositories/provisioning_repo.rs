//! Repository for the `dashboard_provisioning` table.

use dashguard_core::dashboard::ProvisioningInfo;
use dashguard_core::types::DbId;
use sqlx::PgPool;

use super::PgTx;
use crate::models::provisioning::ProvisioningRow;

const COLUMNS: &str = "id, dashboard_id, name, external_id, updated";

pub struct ProvisioningRepo;

impl ProvisioningRepo {
    /// Attach provisioning metadata to a dashboard, replacing any earlier
    /// record for it.
    pub async fn upsert(
        tx: &mut PgTx<'_>,
        dashboard_id: DbId,
        info: &ProvisioningInfo,
    ) -> Result<ProvisioningRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO dashboard_provisioning (dashboard_id, name, external_id, updated) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (dashboard_id) DO UPDATE \
             SET name = EXCLUDED.name, \
                 external_id = EXCLUDED.external_id, \
                 updated = EXCLUDED.updated \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProvisioningRow>(&query)
            .bind(dashboard_id)
            .bind(&info.name)
            .bind(&info.external_id)
            .bind(info.updated)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn list_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Vec<ProvisioningRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dashboard_provisioning WHERE name = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ProvisioningRow>(&query)
            .bind(name)
            .fetch_all(pool)
            .await
    }
}
