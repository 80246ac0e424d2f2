use crate::dashboard::{Dashboard, DashboardRef};
use crate::store::StoreError;
use crate::types::{BoxError, DbId};

/// Every way a dashboard or folder save can be rejected.
///
/// The pipeline fails fast: the first violated rule is returned and nothing
/// is aggregated or retried.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Dashboard title cannot be empty")]
    TitleEmpty,

    #[error("Dashboard uid contains invalid characters")]
    InvalidUid,

    #[error("Dashboard uid is longer than {max} characters")]
    UidTooLong { max: usize },

    #[error("A folder cannot be placed inside another folder")]
    FolderCannotHaveParent,

    #[error("A folder cannot be named '{0}'")]
    FolderNameReserved(&'static str),

    #[error("Dashboard contains invalid alert data: {0}")]
    InvalidAlertData(String),

    #[error("Dashboard not found: id {id} in org {org_id}")]
    NotFound { org_id: DbId, id: DbId },

    #[error("Folder not found: id {folder_id} in org {org_id}")]
    FolderNotFound { org_id: DbId, folder_id: DbId },

    #[error("Cannot change an existing {existing} into a {requested}")]
    TypeMismatch {
        existing: &'static str,
        requested: &'static str,
    },

    #[error("A dashboard or folder with the same name already exists in this folder")]
    SameNameInFolderExists { existing: Option<DashboardRef> },

    #[error("A dashboard cannot have the same name as a folder next to it")]
    SameNameAsFolder { folder: DashboardRef },

    #[error("A folder cannot have the same name as a dashboard next to it")]
    FolderSameNameAsDashboard { dashboard: DashboardRef },

    #[error("A dashboard with the same uid already exists")]
    SameUidExists { uid: String },

    #[error("The dashboard has been changed by someone else")]
    VersionMismatch,

    #[error("Access denied to save dashboard")]
    UpdateAccessDenied,

    #[error(transparent)]
    PermissionCheck(BoxError),

    /// The dashboard was committed but its alert rules were not synchronized.
    #[error("Dashboard saved (id {}) but alert sync failed: {source}", .dashboard.id)]
    AlertSyncFailed {
        dashboard: Box<Dashboard>,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Store(BoxError),
}

/// Coarse classification of [`DashboardError`] for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed request; fix the input.
    Validation,
    /// A referenced id or folder does not exist in the organization.
    NotFound,
    /// Naming, uid, kind, or version conflict with stored state.
    Conflict,
    /// The permission evaluator declined the write.
    Forbidden,
    /// The write committed but a post-commit step failed.
    Partial,
    /// Storage or permission infrastructure failure.
    Internal,
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TitleEmpty
            | Self::InvalidUid
            | Self::UidTooLong { .. }
            | Self::FolderCannotHaveParent
            | Self::FolderNameReserved(_)
            | Self::InvalidAlertData(_) => ErrorKind::Validation,
            Self::NotFound { .. } | Self::FolderNotFound { .. } => ErrorKind::NotFound,
            Self::TypeMismatch { .. }
            | Self::SameNameInFolderExists { .. }
            | Self::SameNameAsFolder { .. }
            | Self::FolderSameNameAsDashboard { .. }
            | Self::SameUidExists { .. }
            | Self::VersionMismatch => ErrorKind::Conflict,
            Self::UpdateAccessDenied => ErrorKind::Forbidden,
            Self::AlertSyncFailed { .. } => ErrorKind::Partial,
            Self::PermissionCheck(_) | Self::Store(_) => ErrorKind::Internal,
        }
    }

    /// `true` when repeating the whole operation may succeed without changing
    /// the request: after refetching on a version conflict, or on transient
    /// storage failures.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionMismatch | Self::Store(_))
    }

    /// The committed dashboard, if the save itself went through.
    pub fn committed_dashboard(&self) -> Option<&Dashboard> {
        match self {
            Self::AlertSyncFailed { dashboard, .. } => Some(dashboard.as_ref()),
            _ => None,
        }
    }
}

impl From<StoreError> for DashboardError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict => Self::VersionMismatch,
            StoreError::TitleConflict => Self::SameNameInFolderExists { existing: None },
            StoreError::UidConflict { uid } => Self::SameUidExists { uid },
            StoreError::Backend(source) => Self::Store(source),
        }
    }
}
