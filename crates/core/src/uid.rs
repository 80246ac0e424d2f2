//! Short uid validation and generation.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::DashboardError;

/// Longest uid a caller may supply.
pub const MAX_UID_LENGTH: usize = 40;

/// Length of generated uids (alphanumeric characters).
pub const GENERATED_UID_LENGTH: usize = 9;

static SHORT_UID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\-_]*$").expect("valid regex"));

/// Returns `true` if `uid` only uses URL-safe short-uid characters.
pub fn is_valid_short_uid(uid: &str) -> bool {
    SHORT_UID_RE.is_match(uid)
}

/// Validate a caller-supplied uid: character set first, then length.
pub fn validate_uid(uid: &str) -> Result<(), DashboardError> {
    if !is_valid_short_uid(uid) {
        return Err(DashboardError::InvalidUid);
    }
    if uid.len() > MAX_UID_LENGTH {
        return Err(DashboardError::UidTooLong {
            max: MAX_UID_LENGTH,
        });
    }
    Ok(())
}

/// Generate a new random uid for an entity created without one.
pub fn generate_uid() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(GENERATED_UID_LENGTH)
        .map(char::from)
        .collect()
}
