//! Repository for the `dashboard_versions` history table.

use dashguard_core::types::{DbId, Version};
use sqlx::PgPool;

use super::PgTx;
use crate::models::dashboard::DashboardRow;
use crate::models::dashboard_version::DashboardVersion;

const COLUMNS: &str =
    "id, dashboard_id, parent_version, version, message, data, created_by, created_at";

/// Append-only version history.
pub struct DashboardVersionRepo;

impl DashboardVersionRepo {
    /// Record the state of `saved` as a new history entry.
    pub async fn append(
        tx: &mut PgTx<'_>,
        saved: &DashboardRow,
        parent_version: Version,
        message: &str,
    ) -> Result<DashboardVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO dashboard_versions \
                (dashboard_id, parent_version, version, message, data, created_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DashboardVersion>(&query)
            .bind(saved.id)
            .bind(parent_version)
            .bind(saved.version)
            .bind(message)
            .bind(&saved.data)
            .bind(saved.updated_by)
            .bind(saved.updated_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// History of one dashboard, newest first.
    pub async fn list_by_dashboard(
        pool: &PgPool,
        dashboard_id: DbId,
    ) -> Result<Vec<DashboardVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dashboard_versions \
             WHERE dashboard_id = $1 \
             ORDER BY version DESC"
        );
        sqlx::query_as::<_, DashboardVersion>(&query)
            .bind(dashboard_id)
            .fetch_all(pool)
            .await
    }
}
