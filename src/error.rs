//! Error types for state migrations

use thiserror::Error;

/// Result type for migration operations
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Errors that can occur while migrating a state document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    #[error("Malformed state: {0}")]
    MalformedState(String),

    #[error("Version mismatch: migration {expected} produced version {actual}")]
    VersionMismatch { expected: u64, actual: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl MigrationError {
    /// Build a `MalformedState` error for a field holding the wrong JSON type
    pub fn unexpected_type(path: &str, expected: &str, found: &serde_json::Value) -> Self {
        MigrationError::MalformedState(format!(
            "{} must be {}, found {}",
            path,
            expected,
            json_type_name(found)
        ))
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        MigrationError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MigrationError {
    fn from(err: serde_json::Error) -> Self {
        MigrationError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for MigrationError {
    fn from(err: toml::de::Error) -> Self {
        MigrationError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_error_display_all_variants() {
        let test_cases = vec![
            (
                MigrationError::MalformedState("bad tree".to_string()),
                "Malformed state: bad tree",
            ),
            (
                MigrationError::VersionMismatch {
                    expected: 52,
                    actual: 51,
                },
                "Version mismatch: migration 52 produced version 51",
            ),
            (
                MigrationError::InvalidConfig("bad config".to_string()),
                "Invalid configuration: bad config",
            ),
            (
                MigrationError::Serialization("serde error".to_string()),
                "Serialization error: serde error",
            ),
            (
                MigrationError::Io("disk gone".to_string()),
                "IO error: disk gone",
            ),
        ];

        for (error, expected_message) in test_cases {
            assert_eq!(
                error.to_string(),
                expected_message,
                "Display mismatch for {:?}",
                error
            );
        }
    }

    #[test]
    fn test_unexpected_type_names_found_type() {
        let err = MigrationError::unexpected_type("accountTokens", "an object", &json!([1, 2]));
        assert_eq!(
            err.to_string(),
            "Malformed state: accountTokens must be an object, found an array"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: MigrationError = io_err.into();

        match err {
            MigrationError::Io(msg) => assert!(msg.contains("file not found")),
            other => panic!("Expected Io variant, got: {:?}", other),
        }
    }

    #[test]
    fn test_from_serde_json_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let err: MigrationError = serde_err.into();
        assert!(matches!(err, MigrationError::Serialization(msg) if !msg.is_empty()));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_err = toml::from_str::<toml::Value>("= no key").unwrap_err();
        let err: MigrationError = toml_err.into();
        assert!(matches!(err, MigrationError::InvalidConfig(_)));
    }
}
