//! Short opaque identifiers for assets and projects

use std::time::{SystemTime, UNIX_EPOCH};

/// Length of a generated short id
pub const SHORT_ID_LEN: usize = 8;

/// Generate a new short id: the first 8 hex digits of a random UUID.
///
/// Ids are only unique within a single store; callers that persist
/// records check for collisions themselves.
pub fn short_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(SHORT_ID_LEN);
    id
}

/// Check that an id is safe to use as a file stem.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Current wall-clock time as fractional seconds since the Unix epoch
pub fn now_epoch_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_shape() {
        let id = short_id();
        assert_eq!(id.len(), SHORT_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(is_valid_id(&id));
    }

    #[test]
    fn test_short_ids_differ() {
        let a = short_id();
        let b = short_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejects_path_like_ids() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../etc"));
        assert!(!is_valid_id("a/b"));
        assert!(!is_valid_id("a.json"));
        assert!(is_valid_id("commercial_ad"));
        assert!(is_valid_id("3f2a-99"));
    }

    #[test]
    fn test_clock_is_after_2020() {
        assert!(now_epoch_secs() > 1_577_836_800.0);
    }
}
