//! Error types for Reel

use thiserror::Error;

/// The main error type for Reel operations
///
/// Not-found conditions are never errors: lookups return `Option` and
/// removals return `bool`.
#[derive(Debug, Error)]
pub enum ReelError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Thumbnail error: {0}")]
    ThumbnailError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("Invalid enum value: {value} is not one of {allowed:?}")]
    InvalidEnumValue {
        value: String,
        allowed: Vec<String>,
    },
}

/// Result type alias for Reel operations
pub type Result<T> = std::result::Result<T, ReelError>;

impl ReelError {
    /// Whether this error was raised before anything was persisted
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ReelError::ValidationError(_)
                | ReelError::ValueOutOfRange { .. }
                | ReelError::InvalidEnumValue { .. }
        )
    }
}

impl From<serde_json::Error> for ReelError {
    fn from(err: serde_json::Error) -> Self {
        ReelError::JsonError(err.to_string())
    }
}

impl From<toml::de::Error> for ReelError {
    fn from(err: toml::de::Error) -> Self {
        ReelError::TomlParseError(err.to_string())
    }
}

impl From<tempfile::PersistError> for ReelError {
    fn from(err: tempfile::PersistError) -> Self {
        ReelError::IoError(err.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(ReelError::ValidationError("empty filename".into()).is_validation());
        assert!(ReelError::ValueOutOfRange {
            field: "duration".into(),
            min: 2,
            max: 12,
            value: 30,
        }
        .is_validation());

        let io = ReelError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(!io.is_validation());
    }

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let reel: ReelError = err.into();
        assert!(matches!(reel, ReelError::JsonError(_)));
    }
}
