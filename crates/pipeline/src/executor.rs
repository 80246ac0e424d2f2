//! Turns a validated request and its resolved target into the write handed to
//! the store.

use chrono::Utc;
use dashguard_core::dashboard::{slugify, Dashboard, DashboardCommit, SaveDashboardRequest};
use dashguard_core::uid::generate_uid;
use serde_json::Value;

/// Build the commit for `request`.
///
/// `target` is the entity being updated, `None` on create. The uid is the
/// caller's on create or on an update that explicitly changes it, the
/// target's otherwise, and freshly generated when neither exists. Title, uid
/// and version are mirrored into the body.
pub(crate) fn build_commit(
    request: SaveDashboardRequest,
    target: Option<&Dashboard>,
    retargeted: bool,
) -> DashboardCommit {
    let uid = match (target, request.uid) {
        (Some(target), _) if retargeted => target.uid.clone(),
        (_, Some(uid)) => uid,
        (Some(target), None) => target.uid.clone(),
        (None, None) => generate_uid(),
    };

    let version = target.map_or(1, |t| t.version + 1);

    let mut data = request.data;
    data.insert("title".into(), Value::String(request.title.clone()));
    data.insert("uid".into(), Value::String(uid.clone()));
    data.insert("version".into(), Value::from(version));

    DashboardCommit {
        id: target.map(|t| t.id),
        uid,
        org_id: request.org_id,
        folder_id: request.folder_id,
        is_folder: request.is_folder,
        slug: slugify(&request.title),
        title: request.title,
        version,
        expected_prior_version: target.map(|t| t.version),
        data,
        user_id: request.user.user_id,
        message: request.message.unwrap_or_default(),
        updated_at: request.updated_at.unwrap_or_else(Utc::now),
    }
}
