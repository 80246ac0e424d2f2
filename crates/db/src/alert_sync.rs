//! Alert reconciliation against the `alerts` table.

use async_trait::async_trait;
use dashguard_core::alert::{extract_alerts, AlertSync};
use dashguard_core::dashboard::Dashboard;
use dashguard_core::types::{BoxError, DbId};

use crate::repositories::AlertRepo;
use crate::DbPool;

/// [`AlertSync`] that mirrors a dashboard's panel alerts into the `alerts`
/// table: upserts every extracted rule and deletes rules whose panel is gone.
#[derive(Clone)]
pub struct PgAlertSync {
    pool: DbPool,
}

impl PgAlertSync {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertSync for PgAlertSync {
    async fn reconcile(
        &self,
        org_id: DbId,
        user_id: DbId,
        dashboard: &Dashboard,
    ) -> Result<(), BoxError> {
        let rules = extract_alerts(&dashboard.data)?;

        let mut tx = self.pool.begin().await?;
        for rule in &rules {
            AlertRepo::upsert(&mut tx, org_id, dashboard.id, user_id, rule).await?;
        }
        let panel_ids: Vec<i64> = rules.iter().map(|r| r.panel_id).collect();
        let removed = AlertRepo::delete_stale(&mut tx, dashboard.id, &panel_ids).await?;
        tx.commit().await?;

        tracing::debug!(
            org_id,
            dashboard_id = dashboard.id,
            upserted = rules.len(),
            removed,
            "Alerts reconciled"
        );
        Ok(())
    }
}
