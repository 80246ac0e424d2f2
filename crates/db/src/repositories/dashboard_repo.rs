//! Repository for the `dashboards` table.

use dashguard_core::dashboard::DashboardCommit;
use dashguard_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use super::PgTx;
use crate::models::dashboard::DashboardRow;

/// Column list for `dashboards` queries.
const COLUMNS: &str = "id, uid, org_id, folder_id, is_folder, title, slug, version, data, \
    created_by, updated_by, created_at, updated_at";

/// Unique index on `(org_id, uid)`.
pub const UQ_ORG_UID: &str = "uq_dashboards_org_uid";

/// Unique index on `(org_id, folder_id, lower(title))`.
pub const UQ_ORG_FOLDER_TITLE: &str = "uq_dashboards_org_folder_title";

/// Lookups and version-guarded writes for dashboards and folders.
pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn find_by_id(
        pool: &PgPool,
        org_id: DbId,
        id: DbId,
    ) -> Result<Option<DashboardRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboards WHERE org_id = $1 AND id = $2");
        sqlx::query_as::<_, DashboardRow>(&query)
            .bind(org_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_uid(
        pool: &PgPool,
        org_id: DbId,
        uid: &str,
    ) -> Result<Option<DashboardRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboards WHERE org_id = $1 AND uid = $2");
        sqlx::query_as::<_, DashboardRow>(&query)
            .bind(org_id)
            .bind(uid)
            .fetch_optional(pool)
            .await
    }

    /// Every entity of either kind whose title matches `title`
    /// case-insensitively inside one folder, optionally excluding one id.
    pub async fn find_by_title_in_scope(
        pool: &PgPool,
        org_id: DbId,
        folder_id: DbId,
        title: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<DashboardRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dashboards \
             WHERE org_id = $1 AND folder_id = $2 AND lower(title) = lower($3) \
               AND ($4::BIGINT IS NULL OR id <> $4) \
             ORDER BY id"
        );
        sqlx::query_as::<_, DashboardRow>(&query)
            .bind(org_id)
            .bind(folder_id)
            .bind(title)
            .bind(exclude_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a new row from a create commit.
    pub async fn insert(
        tx: &mut PgTx<'_>,
        commit: &DashboardCommit,
    ) -> Result<DashboardRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO dashboards \
                (uid, org_id, folder_id, is_folder, title, slug, version, data, \
                 created_by, updated_by, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DashboardRow>(&query)
            .bind(&commit.uid)
            .bind(commit.org_id)
            .bind(commit.folder_id)
            .bind(commit.is_folder)
            .bind(&commit.title)
            .bind(&commit.slug)
            .bind(commit.version)
            .bind(Json(&commit.data))
            .bind(commit.user_id)
            .bind(commit.updated_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Apply an update commit only if the row still carries
    /// `expected_version`. Returns `None` when the row is gone or has moved on.
    pub async fn update_versioned(
        tx: &mut PgTx<'_>,
        id: DbId,
        expected_version: i32,
        commit: &DashboardCommit,
    ) -> Result<Option<DashboardRow>, sqlx::Error> {
        let query = format!(
            "UPDATE dashboards SET \
                uid = $4, folder_id = $5, title = $6, slug = $7, version = $8, \
                data = $9, updated_by = $10, updated_at = $11 \
             WHERE org_id = $1 AND id = $2 AND version = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DashboardRow>(&query)
            .bind(commit.org_id)
            .bind(id)
            .bind(expected_version)
            .bind(&commit.uid)
            .bind(commit.folder_id)
            .bind(&commit.title)
            .bind(&commit.slug)
            .bind(commit.version)
            .bind(Json(&commit.data))
            .bind(commit.user_id)
            .bind(commit.updated_at)
            .fetch_optional(&mut **tx)
            .await
    }
}
