//! Identity resolution: which stored entity (if any) a request addresses, and
//! which folder it lands in.

use dashguard_core::dashboard::{Dashboard, SaveDashboardRequest, ROOT_FOLDER_ID};
use dashguard_core::error::DashboardError;
use dashguard_core::store::DashboardStore;

/// Resolve the entity a normalized request addresses.
///
/// An id wins over a uid and must exist in the request's organization. A uid
/// alone that matches nothing means "create with this uid". When an update by
/// id also carries a different uid, that uid must not belong to another
/// entity.
pub(crate) async fn resolve_target(
    store: &dyn DashboardStore,
    request: &SaveDashboardRequest,
) -> Result<Option<Dashboard>, DashboardError> {
    let org_id = request.org_id;

    if let Some(id) = request.id {
        let existing = store
            .find_by_id(org_id, id)
            .await?
            .ok_or(DashboardError::NotFound { org_id, id })?;

        if let Some(uid) = request.uid.as_deref().filter(|uid| *uid != existing.uid) {
            if let Some(other) = store.find_by_uid(org_id, uid).await? {
                if other.id != existing.id {
                    return Err(DashboardError::SameUidExists {
                        uid: uid.to_string(),
                    });
                }
            }
            tracing::debug!(org_id, id, new_uid = uid, "Changing dashboard uid");
        }

        return Ok(Some(existing));
    }

    if let Some(uid) = request.uid.as_deref() {
        let existing = store.find_by_uid(org_id, uid).await?;
        if existing.is_none() {
            tracing::debug!(org_id, uid, "No dashboard with uid, creating");
        }
        return Ok(existing);
    }

    Ok(None)
}

/// Look up the destination folder. The root folder has no row.
pub(crate) async fn resolve_folder(
    store: &dyn DashboardStore,
    request: &SaveDashboardRequest,
) -> Result<Option<Dashboard>, DashboardError> {
    let org_id = request.org_id;
    let folder_id = request.folder_id;

    if folder_id == ROOT_FOLDER_ID {
        return Ok(None);
    }

    store
        .find_by_id(org_id, folder_id)
        .await?
        .filter(|folder| folder.is_folder)
        .map(Some)
        .ok_or(DashboardError::FolderNotFound { org_id, folder_id })
}
