//! Error types for configuration operations.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Classification tag carried by every schema validation failure.
pub const VALIDATION_CATEGORY: &str = "ValidationError";

/// One structured schema validation failure.
///
/// `path` is an RFC 6901 JSON Pointer to the offending location; `details` is
/// the human-readable reason. The wire shape adds the fixed
/// [`VALIDATION_CATEGORY`] tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{details} (at {path})")]
pub struct SchemaViolation {
    /// Human-readable reason for the failure.
    pub details: String,
    /// JSON Pointer to the offending field or operation.
    pub path: String,
}

impl SchemaViolation {
    /// Build a violation for the given pointer.
    #[must_use]
    pub fn new(details: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            details: details.into(),
            path: path.into(),
        }
    }
}

impl Serialize for SchemaViolation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("SchemaViolation", 3)?;
        state.serialize_field("details", &self.details)?;
        state.serialize_field("category", VALIDATION_CATEGORY)?;
        state.serialize_field("path", &self.path)?;
        state.end()
    }
}

/// A storage failure surfaced verbatim to API clients.
///
/// Mirrors the reporting shape of the original server's runtime: `category`
/// is the POSIX errno name, `errno` the negated OS error number, and
/// `details` the full `"<category>: <reason>, open '<path>'"` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{details}")]
pub struct PersistenceError {
    /// Full native error line.
    pub details: String,
    /// POSIX errno name, e.g. `EACCES`.
    pub category: String,
    /// Negated OS error number, e.g. `-13`.
    pub errno: i64,
    /// Path of the artifact the write was attempted against.
    pub path: String,
}

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration artifact does not exist on disk.
    #[error("configuration file not found at {path}")]
    NotFound {
        /// Path that was probed.
        path: PathBuf,
    },
    /// The artifact exists but is not parseable as a configuration document.
    #[error("configuration file at {path} is malformed: {detail}")]
    Malformed {
        /// Path of the unreadable artifact.
        path: PathBuf,
        /// Parser failure description.
        detail: String,
    },
    /// Create was attempted while a configuration already exists.
    #[error("the config file already exists")]
    AlreadyExists,
    /// Update was attempted before any configuration was created.
    #[error("the config file does not exist")]
    NotInitialized,
    /// A document failed the creation schema.
    #[error("invalid request data")]
    Validation(#[source] SchemaViolation),
    /// A PATCH document failed structural validation.
    #[error("invalid PATCH data")]
    PatchValidation(#[source] SchemaViolation),
    /// Writing the artifact failed.
    #[error("unable to persist config file")]
    Persistence(#[source] PersistenceError),
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_violation_serializes_with_fixed_category() {
        let violation = SchemaViolation::new(r#""dbConfig" is required"#, "/dbConfig");
        let value = serde_json::to_value(&violation).expect("serializes");
        assert_eq!(
            value,
            json!({
                "details": "\"dbConfig\" is required",
                "category": "ValidationError",
                "path": "/dbConfig",
            })
        );
    }

    #[test]
    fn persistence_error_keeps_native_fields() {
        let error = PersistenceError {
            details: "EACCES: permission denied, open './config/local.json'".to_string(),
            category: "EACCES".to_string(),
            errno: -13,
            path: "./config/local.json".to_string(),
        };
        let value = serde_json::to_value(&error).expect("serializes");
        assert_eq!(value["category"], "EACCES");
        assert_eq!(value["errno"], -13);
    }
}
