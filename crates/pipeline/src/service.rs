//! The validate-before-save service for dashboards and folders.
//!
//! [`DashboardService`] runs every save through the same sequence:
//! request validation, identity resolution, kind check, title uniqueness,
//! version check, permission gate, commit, alert sync. Each stage returns the
//! first violated rule; nothing is retried.

use std::sync::Arc;

use dashguard_core::alert::AlertSync;
use dashguard_core::dashboard::{
    Dashboard, DashboardCommit, DashboardProvisioning, ProvisioningInfo, SaveDashboardRequest,
    SignedInUser,
};
use dashguard_core::error::DashboardError;
use dashguard_core::guardian::Guardian;
use dashguard_core::store::DashboardStore;
use dashguard_core::types::DbId;
use dashguard_core::validation::{
    check_kind, check_version, normalize_request, resolve_title_collision,
};

use crate::executor::build_commit;
use crate::resolve::{resolve_folder, resolve_target};

/// Saves dashboards and folders through the injected collaborators.
///
/// Cheap to clone; collaborators are shared behind `Arc`.
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn DashboardStore>,
    guardian: Arc<dyn Guardian>,
    alerts: Arc<dyn AlertSync>,
}

impl DashboardService {
    pub fn new(
        store: Arc<dyn DashboardStore>,
        guardian: Arc<dyn Guardian>,
        alerts: Arc<dyn AlertSync>,
    ) -> Self {
        Self {
            store,
            guardian,
            alerts,
        }
    }

    /// Validate and save a dashboard or folder on behalf of `request.user`.
    ///
    /// On [`DashboardError::AlertSyncFailed`] the save itself succeeded; the
    /// committed dashboard travels inside the error.
    pub async fn save_dashboard(
        &self,
        request: SaveDashboardRequest,
    ) -> Result<Dashboard, DashboardError> {
        let (commit, user) = self.prepare(request).await?;
        let saved = self.store.commit(commit).await?;
        self.sync_alerts(saved, &user).await
    }

    /// Save a dashboard read from a provisioning source.
    ///
    /// Runs as the provisioning admin and stores the provisioning record in
    /// the same transaction as the dashboard.
    pub async fn save_provisioned_dashboard(
        &self,
        mut request: SaveDashboardRequest,
        provisioning: ProvisioningInfo,
    ) -> Result<Dashboard, DashboardError> {
        request.user = SignedInUser::provisioning_admin(request.org_id);
        let (commit, user) = self.prepare(request).await?;

        tracing::debug!(
            provisioner = %provisioning.name,
            external_id = %provisioning.external_id,
            "Saving provisioned dashboard"
        );
        let saved = self.store.commit_provisioned(commit, provisioning).await?;
        self.sync_alerts(saved, &user).await
    }

    /// Save the folder that provisioned dashboards are placed into.
    pub async fn save_folder_for_provisioned_dashboards(
        &self,
        mut request: SaveDashboardRequest,
    ) -> Result<Dashboard, DashboardError> {
        request.user = SignedInUser::provisioning_admin(request.org_id);
        self.save_dashboard(request).await
    }

    /// Provisioning records written by the named provisioner.
    pub async fn provisioned_dashboards(
        &self,
        name: &str,
    ) -> Result<Vec<DashboardProvisioning>, DashboardError> {
        Ok(self.store.provisioned_dashboards(name).await?)
    }

    /// Run every check up to, but not including, the commit.
    async fn prepare(
        &self,
        request: SaveDashboardRequest,
    ) -> Result<(DashboardCommit, SignedInUser), DashboardError> {
        let request = normalize_request(request)?;
        let store = self.store.as_ref();
        let org_id = request.org_id;

        // Identity
        let mut target = resolve_target(store, &request).await?;
        resolve_folder(store, &request).await?;

        // Kind
        if let Some(existing) = &target {
            check_kind(existing, request.is_folder)?;
        }

        // Uniqueness
        let matches = store
            .find_by_title_in_scope(
                org_id,
                request.folder_id,
                &request.title,
                target.as_ref().map(|t| t.id),
            )
            .await?;
        let mut retargeted = false;
        if let Some(existing) =
            resolve_title_collision(request.is_folder, request.overwrite, &matches)?
        {
            tracing::warn!(
                org_id,
                requested_id = ?request.id,
                requested_uid = ?request.uid,
                overwritten_id = existing.id,
                overwritten_uid = %existing.uid,
                "Overwriting existing dashboard with the same title"
            );
            target = Some(existing.clone());
            retargeted = true;
        }

        // Version
        if let Some(existing) = &target {
            check_version(existing, request.expected_version, request.overwrite)?;
        }

        // Permission
        let check_id = target.as_ref().map_or(request.folder_id, |t| t.id);
        self.check_permission(check_id, org_id, &request.user)
            .await?;

        let user = request.user.clone();
        let commit = build_commit(request, target.as_ref(), retargeted);
        tracing::debug!(
            org_id,
            id = ?commit.id,
            uid = %commit.uid,
            version = commit.version,
            "Dashboard save validated"
        );
        Ok((commit, user))
    }

    async fn check_permission(
        &self,
        dashboard_id: DbId,
        org_id: DbId,
        user: &SignedInUser,
    ) -> Result<(), DashboardError> {
        match self.guardian.can_save(dashboard_id, org_id, user).await {
            Ok(true) => Ok(()),
            Ok(false) => {
                tracing::debug!(
                    dashboard_id,
                    org_id,
                    user_id = user.user_id,
                    "Dashboard save denied"
                );
                Err(DashboardError::UpdateAccessDenied)
            }
            Err(e) => Err(DashboardError::PermissionCheck(e)),
        }
    }

    async fn sync_alerts(
        &self,
        saved: Dashboard,
        user: &SignedInUser,
    ) -> Result<Dashboard, DashboardError> {
        tracing::info!(
            org_id = saved.org_id,
            id = saved.id,
            uid = %saved.uid,
            version = saved.version,
            is_folder = saved.is_folder,
            "Dashboard saved"
        );

        match self
            .alerts
            .reconcile(saved.org_id, user.user_id, &saved)
            .await
        {
            Ok(()) => Ok(saved),
            Err(source) => {
                tracing::warn!(
                    error = %source,
                    org_id = saved.org_id,
                    id = saved.id,
                    "Dashboard saved but alert sync failed"
                );
                Err(DashboardError::AlertSyncFailed {
                    dashboard: Box::new(saved),
                    source,
                })
            }
        }
    }
}
