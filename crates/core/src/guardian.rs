//! Permission collaborator contract.

use async_trait::async_trait;

use crate::dashboard::SignedInUser;
use crate::types::{BoxError, DbId};

/// Decides whether a user may write to a dashboard or folder.
///
/// `dashboard_id` is the target's id on update, or the destination folder's
/// id on create (`0` for the root folder).
#[async_trait]
pub trait Guardian: Send + Sync {
    async fn can_save(
        &self,
        dashboard_id: DbId,
        org_id: DbId,
        user: &SignedInUser,
    ) -> Result<bool, BoxError>;
}
