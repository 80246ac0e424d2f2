//! Pure save rules: request shape, kind immutability, title collisions and
//! optimistic concurrency. Nothing here touches storage; the pipeline feeds
//! these functions what it has looked up.

use crate::alert::extract_alerts;
use crate::dashboard::{kind_name, Dashboard, SaveDashboardRequest, ROOT_FOLDER_ID, ROOT_FOLDER_NAME};
use crate::error::DashboardError;
use crate::types::Version;
use crate::uid::validate_uid;

/// Normalize and check a request before any storage I/O.
///
/// Trims title and uid, drops a zero id and a blank uid, then rejects, in
/// order: empty title, nested folder, folder named like the root folder,
/// malformed uid, invalid embedded alert definitions.
pub fn normalize_request(
    mut request: SaveDashboardRequest,
) -> Result<SaveDashboardRequest, DashboardError> {
    request.title = request.title.trim().to_string();
    request.uid = request
        .uid
        .as_deref()
        .map(str::trim)
        .filter(|uid| !uid.is_empty())
        .map(str::to_string);
    request.id = request.addressed_id();

    if request.title.is_empty() {
        return Err(DashboardError::TitleEmpty);
    }

    if request.is_folder && request.folder_id != ROOT_FOLDER_ID {
        return Err(DashboardError::FolderCannotHaveParent);
    }

    if request.is_folder && titles_match(&request.title, ROOT_FOLDER_NAME) {
        return Err(DashboardError::FolderNameReserved(ROOT_FOLDER_NAME));
    }

    if let Some(uid) = &request.uid {
        validate_uid(uid)?;
    }

    extract_alerts(&request.data).map_err(|e| DashboardError::InvalidAlertData(e.to_string()))?;

    Ok(request)
}

/// Case-insensitive title comparison used by every uniqueness rule.
pub fn titles_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// An existing entity can never change between folder and dashboard.
pub fn check_kind(existing: &Dashboard, is_folder: bool) -> Result<(), DashboardError> {
    if existing.is_folder != is_folder {
        return Err(DashboardError::TypeMismatch {
            existing: existing.kind_name(),
            requested: kind_name(is_folder),
        });
    }
    Ok(())
}

/// Decide what a title collision in the destination folder means.
///
/// `matches` are the entities sharing the title in that folder, target
/// excluded. Cross-kind clashes always fail. A same-kind clash fails unless
/// `overwrite` is set, in which case the colliding entity is returned and
/// becomes the new target.
pub fn resolve_title_collision<'a>(
    is_folder: bool,
    overwrite: bool,
    matches: &'a [Dashboard],
) -> Result<Option<&'a Dashboard>, DashboardError> {
    if let Some(other) = matches.iter().find(|m| m.is_folder != is_folder) {
        return Err(if other.is_folder {
            DashboardError::SameNameAsFolder {
                folder: other.to_ref(),
            }
        } else {
            DashboardError::FolderSameNameAsDashboard {
                dashboard: other.to_ref(),
            }
        });
    }

    match matches.first() {
        None => Ok(None),
        Some(existing) if overwrite => Ok(Some(existing)),
        Some(existing) => Err(DashboardError::SameNameInFolderExists {
            existing: Some(existing.to_ref()),
        }),
    }
}

/// Optimistic concurrency check for the update path.
///
/// An explicit expected version must match exactly, overwrite or not.
/// Without one, only `overwrite` lets the write through.
pub fn check_version(
    target: &Dashboard,
    expected: Option<Version>,
    overwrite: bool,
) -> Result<(), DashboardError> {
    match expected {
        Some(version) if version == target.version => Ok(()),
        Some(_) => Err(DashboardError::VersionMismatch),
        None if overwrite => Ok(()),
        None => Err(DashboardError::VersionMismatch),
    }
}
