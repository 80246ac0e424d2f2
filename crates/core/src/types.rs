/// Organization-scoped primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Dashboard versions start at 1 and grow by one per update.
pub type Version = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Boxed error returned by injected collaborators (guardian, alert sync,
/// storage backends).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
