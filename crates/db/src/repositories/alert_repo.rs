//! Repository for the `alerts` table.

use dashguard_core::alert::AlertRule;
use dashguard_core::types::DbId;
use sqlx::PgPool;

use super::PgTx;
use crate::models::alert::AlertRow;

const COLUMNS: &str = "id, org_id, dashboard_id, panel_id, name, message, frequency_secs, \
    settings, updated_by, created_at, updated_at";

/// Alert rules keyed by `(dashboard_id, panel_id)`.
pub struct AlertRepo;

impl AlertRepo {
    pub async fn list_by_dashboard(
        pool: &PgPool,
        dashboard_id: DbId,
    ) -> Result<Vec<AlertRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts WHERE dashboard_id = $1 ORDER BY panel_id"
        );
        sqlx::query_as::<_, AlertRow>(&query)
            .bind(dashboard_id)
            .fetch_all(pool)
            .await
    }

    /// Insert or refresh the rule for one panel.
    pub async fn upsert(
        tx: &mut PgTx<'_>,
        org_id: DbId,
        dashboard_id: DbId,
        user_id: DbId,
        rule: &AlertRule,
    ) -> Result<AlertRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts \
                (org_id, dashboard_id, panel_id, name, message, frequency_secs, settings, updated_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (dashboard_id, panel_id) DO UPDATE \
             SET name = EXCLUDED.name, \
                 message = EXCLUDED.message, \
                 frequency_secs = EXCLUDED.frequency_secs, \
                 settings = EXCLUDED.settings, \
                 updated_by = EXCLUDED.updated_by, \
                 updated_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlertRow>(&query)
            .bind(org_id)
            .bind(dashboard_id)
            .bind(rule.panel_id)
            .bind(&rule.name)
            .bind(&rule.message)
            .bind(rule.frequency_secs)
            .bind(&rule.settings)
            .bind(user_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete the dashboard's rules whose panel is not in `keep_panel_ids`.
    /// Returns the number of rows removed.
    pub async fn delete_stale(
        tx: &mut PgTx<'_>,
        dashboard_id: DbId,
        keep_panel_ids: &[i64],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM alerts WHERE dashboard_id = $1 AND NOT (panel_id = ANY($2))",
        )
        .bind(dashboard_id)
        .bind(keep_panel_ids)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}
