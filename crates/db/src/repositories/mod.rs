//! Repository layer.
//!
//! Each repository is a zero-sized struct. Reads accept `&PgPool`; writes
//! that must land atomically with other writes accept the open transaction.

pub mod alert_repo;
pub mod dashboard_repo;
pub mod dashboard_version_repo;
pub mod provisioning_repo;

pub use alert_repo::AlertRepo;
pub use dashboard_repo::DashboardRepo;
pub use dashboard_version_repo::DashboardVersionRepo;
pub use provisioning_repo::ProvisioningRepo;

/// Open PostgreSQL transaction shared by the write paths.
pub type PgTx<'c> = sqlx::Transaction<'c, sqlx::Postgres>;
