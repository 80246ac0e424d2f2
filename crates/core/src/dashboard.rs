//! Dashboard / folder entity model, save request, and commit DTOs.
//!
//! A folder is a dashboard row with `is_folder = true`. Folders always live at
//! the root (`folder_id = 0`, the implicit "General" folder).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{DbId, Timestamp, Version};

/// Name of the implicit root folder. No real folder may use it.
pub const ROOT_FOLDER_NAME: &str = "General";

/// `folder_id` of anything stored at the root.
pub const ROOT_FOLDER_ID: DbId = 0;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A committed dashboard or folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: DbId,
    pub uid: String,
    pub org_id: DbId,
    pub folder_id: DbId,
    pub is_folder: bool,
    pub title: String,
    pub slug: String,
    pub version: Version,
    /// Panel/layout definition. `title`, `uid` and `version` mirror the
    /// record fields.
    pub data: Map<String, Value>,
    pub created_by: DbId,
    pub updated_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Dashboard {
    /// Human-readable kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        kind_name(self.is_folder)
    }

    pub fn to_ref(&self) -> DashboardRef {
        DashboardRef {
            id: self.id,
            uid: self.uid.clone(),
            title: self.title.clone(),
            folder_id: self.folder_id,
            version: self.version,
        }
    }
}

pub(crate) fn kind_name(is_folder: bool) -> &'static str {
    if is_folder {
        "folder"
    } else {
        "dashboard"
    }
}

/// Pointer to an existing entity, attached to naming conflicts so a client can
/// offer to overwrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRef {
    pub id: DbId,
    pub uid: String,
    pub title: String,
    pub folder_id: DbId,
    pub version: Version,
}

// ---------------------------------------------------------------------------
// Caller identity
// ---------------------------------------------------------------------------

/// Organization role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
    Viewer,
    Editor,
    Admin,
}

/// The caller on whose behalf a save runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedInUser {
    pub user_id: DbId,
    pub org_id: DbId,
    pub org_role: OrgRole,
}

impl SignedInUser {
    pub fn new(user_id: DbId, org_id: DbId, org_role: OrgRole) -> Self {
        Self {
            user_id,
            org_id,
            org_role,
        }
    }

    /// The synthetic admin used by file provisioning (user id 0).
    pub fn provisioning_admin(org_id: DbId) -> Self {
        Self::new(0, org_id, OrgRole::Admin)
    }
}

// ---------------------------------------------------------------------------
// Save request
// ---------------------------------------------------------------------------

/// A caller-issued save of a dashboard or folder.
///
/// Constructed via [`SaveDashboardRequest::new`] and refined with the `with_*`
/// builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDashboardRequest {
    pub org_id: DbId,
    /// Numeric identity; `None` or `Some(0)` means "not addressed by id".
    pub id: Option<DbId>,
    /// String identity; blank means "not addressed by uid".
    pub uid: Option<String>,
    pub folder_id: DbId,
    pub is_folder: bool,
    pub title: String,
    pub data: Map<String, Value>,
    /// Version the caller last saw. Required for updates unless overwriting.
    pub expected_version: Option<Version>,
    pub overwrite: bool,
    pub user: SignedInUser,
    /// Commit message stored with the version history entry.
    pub message: Option<String>,
    /// Explicit modification time (provisioning passes the source file time).
    pub updated_at: Option<Timestamp>,
}

impl SaveDashboardRequest {
    /// A new dashboard at the root of the user's organization.
    pub fn new(title: impl Into<String>, user: SignedInUser) -> Self {
        Self {
            org_id: user.org_id,
            id: None,
            uid: None,
            folder_id: ROOT_FOLDER_ID,
            is_folder: false,
            title: title.into(),
            data: Map::new(),
            expected_version: None,
            overwrite: false,
            user,
            message: None,
            updated_at: None,
        }
    }

    pub fn with_org(mut self, org_id: DbId) -> Self {
        self.org_id = org_id;
        self
    }

    pub fn with_id(mut self, id: DbId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn in_folder(mut self, folder_id: DbId) -> Self {
        self.folder_id = folder_id;
        self
    }

    pub fn as_folder(mut self) -> Self {
        self.is_folder = true;
        self
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.expected_version = Some(version);
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: Timestamp) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// The addressed id, treating `0` as absent.
    pub fn addressed_id(&self) -> Option<DbId> {
        self.id.filter(|id| *id > 0)
    }

    /// The addressed uid, treating blank as absent.
    pub fn addressed_uid(&self) -> Option<&str> {
        self.uid.as_deref().filter(|uid| !uid.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Commit DTOs
// ---------------------------------------------------------------------------

/// The fully resolved write handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCommit {
    /// `Some` when updating an existing row.
    pub id: Option<DbId>,
    pub uid: String,
    pub org_id: DbId,
    pub folder_id: DbId,
    pub is_folder: bool,
    pub title: String,
    pub slug: String,
    /// Version the row will carry after the commit.
    pub version: Version,
    /// Version the row must still carry at commit time (update path only).
    pub expected_prior_version: Option<Version>,
    pub data: Map<String, Value>,
    pub user_id: DbId,
    pub message: String,
    pub updated_at: Timestamp,
}

/// Provisioning metadata supplied by a file provisioner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningInfo {
    /// Name of the provisioner configuration.
    pub name: String,
    /// Path of the source file.
    pub external_id: String,
    /// Unix timestamp of the source file's last modification.
    pub updated: i64,
}

/// A stored provisioning record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardProvisioning {
    pub id: DbId,
    pub dashboard_id: DbId,
    pub name: String,
    pub external_id: String,
    pub updated: i64,
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

/// URL slug for a title: lowercase ASCII alphanumerics, every other run of
/// characters collapsed to a single `-`, no leading or trailing dash.
///
/// ```
/// use dashguard_core::dashboard::slugify;
///
/// assert_eq!(slugify("Saved folder"), "saved-folder");
/// assert_eq!(slugify("  CPU / Memory  "), "cpu-memory");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}
