//! PostgreSQL implementation of [`DashboardStore`].
//!
//! Every commit runs in one transaction: the version-guarded row write, the
//! version history entry and, for provisioned dashboards, the provisioning
//! record. The unique indexes on `(org_id, uid)` and
//! `(org_id, folder_id, lower(title))` catch races the pipeline's reads could
//! not see.

use async_trait::async_trait;
use dashguard_core::dashboard::{
    Dashboard, DashboardCommit, DashboardProvisioning, ProvisioningInfo,
};
use dashguard_core::store::{DashboardStore, StoreError};
use dashguard_core::types::DbId;

use crate::models::dashboard::DashboardRow;
use crate::repositories::dashboard_repo::{UQ_ORG_FOLDER_TITLE, UQ_ORG_UID};
use crate::repositories::{DashboardRepo, DashboardVersionRepo, PgTx, ProvisioningRepo};
use crate::DbPool;

/// [`DashboardStore`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgDashboardStore {
    pool: DbPool,
}

impl PgDashboardStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Write the dashboard row and its history entry inside `tx`.
    async fn write(tx: &mut PgTx<'_>, commit: &DashboardCommit) -> Result<DashboardRow, StoreError> {
        let (saved, parent_version) = match commit.id {
            Some(id) => {
                let expected = commit
                    .expected_prior_version
                    .ok_or(StoreError::VersionConflict)?;
                let row = DashboardRepo::update_versioned(tx, id, expected, commit)
                    .await
                    .map_err(|e| classify(e, commit))?
                    .ok_or(StoreError::VersionConflict)?;
                (row, expected)
            }
            None => {
                let row = DashboardRepo::insert(tx, commit)
                    .await
                    .map_err(|e| classify(e, commit))?;
                (row, 0)
            }
        };

        DashboardVersionRepo::append(tx, &saved, parent_version, &commit.message)
            .await
            .map_err(|e| classify(e, commit))?;

        Ok(saved)
    }
}

#[async_trait]
impl DashboardStore for PgDashboardStore {
    async fn find_by_id(&self, org_id: DbId, id: DbId) -> Result<Option<Dashboard>, StoreError> {
        let row = DashboardRepo::find_by_id(&self.pool, org_id, id)
            .await
            .map_err(backend)?;
        Ok(row.map(Dashboard::from))
    }

    async fn find_by_uid(&self, org_id: DbId, uid: &str) -> Result<Option<Dashboard>, StoreError> {
        let row = DashboardRepo::find_by_uid(&self.pool, org_id, uid)
            .await
            .map_err(backend)?;
        Ok(row.map(Dashboard::from))
    }

    async fn find_by_title_in_scope(
        &self,
        org_id: DbId,
        folder_id: DbId,
        title: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<Dashboard>, StoreError> {
        let rows =
            DashboardRepo::find_by_title_in_scope(&self.pool, org_id, folder_id, title, exclude_id)
                .await
                .map_err(backend)?;
        Ok(rows.into_iter().map(Dashboard::from).collect())
    }

    async fn commit(&self, commit: DashboardCommit) -> Result<Dashboard, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let saved = Self::write(&mut tx, &commit).await?;
        tx.commit().await.map_err(backend)?;
        Ok(saved.into())
    }

    async fn commit_provisioned(
        &self,
        commit: DashboardCommit,
        provisioning: ProvisioningInfo,
    ) -> Result<Dashboard, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let saved = Self::write(&mut tx, &commit).await?;
        ProvisioningRepo::upsert(&mut tx, saved.id, &provisioning)
            .await
            .map_err(backend)?;
        tx.commit().await.map_err(backend)?;
        Ok(saved.into())
    }

    async fn provisioned_dashboards(
        &self,
        name: &str,
    ) -> Result<Vec<DashboardProvisioning>, StoreError> {
        let rows = ProvisioningRepo::list_by_name(&self.pool, name)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(DashboardProvisioning::from).collect())
    }
}

/// Map a write failure, turning unique-index violations into conflicts.
fn classify(err: sqlx::Error, commit: &DashboardCommit) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505
        if db_err.code().as_deref() == Some("23505") {
            match db_err.constraint() {
                Some(UQ_ORG_UID) => {
                    return StoreError::UidConflict {
                        uid: commit.uid.clone(),
                    }
                }
                Some(UQ_ORG_FOLDER_TITLE) => return StoreError::TitleConflict,
                _ => {}
            }
        }
    }
    backend(err)
}

fn backend(err: sqlx::Error) -> StoreError {
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(Box::new(err))
}
