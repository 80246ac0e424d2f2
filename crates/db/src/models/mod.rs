//! Row structs for the dashboard tables.
//!
//! Each submodule contains a `FromRow` struct matching the database row and,
//! where the pipeline consumes it, a conversion into the `dashguard-core`
//! type.

pub mod alert;
pub mod dashboard;
pub mod dashboard_version;
pub mod provisioning;
