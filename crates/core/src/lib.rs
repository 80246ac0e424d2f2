//! Domain model and pure rules for saving dashboards and folders.
//!
//! Holds the entity model, the typed error vocabulary, the validation rules
//! of the save pipeline, and the contracts of its external collaborators
//! (storage, permission guardian, alert sync). No database dependencies.

pub mod alert;
pub mod dashboard;
pub mod error;
pub mod guardian;
pub mod store;
pub mod types;
pub mod uid;
pub mod validation;
