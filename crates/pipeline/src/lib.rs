//! Dashboard save pipeline.
//!
//! Wires the pure rules of `dashguard_core` to the storage, guardian and
//! alert-sync collaborators. See [`DashboardService`].

mod executor;
mod resolve;
pub mod service;

pub use service::DashboardService;
