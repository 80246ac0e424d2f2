//! Storage collaborator contract.
//!
//! The pipeline never talks to a database directly; it reads and commits
//! through a [`DashboardStore`]. Implementations must scope every lookup to an
//! organization and must re-check uniqueness and version invariants at commit
//! time, reporting races through [`StoreError`].

use async_trait::async_trait;

use crate::dashboard::{Dashboard, DashboardCommit, DashboardProvisioning, ProvisioningInfo};
use crate::types::{BoxError, DbId};

/// Failures reported by a [`DashboardStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The row no longer carries the expected prior version.
    #[error("Dashboard version changed before commit")]
    VersionConflict,

    /// Another entity took the same title in the same folder.
    #[error("Dashboard title already taken in folder")]
    TitleConflict,

    /// Another entity of the organization took the same uid.
    #[error("Dashboard uid '{uid}' already taken")]
    UidConflict { uid: String },

    /// Transport or transaction failure, propagated unchanged.
    #[error(transparent)]
    Backend(BoxError),
}

#[async_trait]
pub trait DashboardStore: Send + Sync {
    /// Find by numeric id within the organization.
    async fn find_by_id(&self, org_id: DbId, id: DbId) -> Result<Option<Dashboard>, StoreError>;

    /// Find by uid within the organization.
    async fn find_by_uid(&self, org_id: DbId, uid: &str) -> Result<Option<Dashboard>, StoreError>;

    /// Every entity (folders and dashboards) in `folder_id` whose title equals
    /// `title` case-insensitively, excluding `exclude_id`.
    async fn find_by_title_in_scope(
        &self,
        org_id: DbId,
        folder_id: DbId,
        title: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<Dashboard>, StoreError>;

    /// Atomically insert or update the dashboard and append its version
    /// history entry.
    async fn commit(&self, commit: DashboardCommit) -> Result<Dashboard, StoreError>;

    /// Like [`commit`](Self::commit), also replacing the dashboard's
    /// provisioning record in the same transaction.
    async fn commit_provisioned(
        &self,
        commit: DashboardCommit,
        provisioning: ProvisioningInfo,
    ) -> Result<Dashboard, StoreError>;

    /// All provisioning records written by the named provisioner.
    async fn provisioned_dashboards(
        &self,
        name: &str,
    ) -> Result<Vec<DashboardProvisioning>, StoreError>;
}
