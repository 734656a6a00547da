//! Custom error types for netvault
//!
//! This module defines the error hierarchy for the modeling layer using
//! thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::TransportError;

/// The main error type for netvault operations
#[derive(Error, Debug)]
pub enum VaultError {
    /// A strictly loaded item file does not exist
    #[error("{item_type} not found: {identifier}")]
    NotFound {
        item_type: &'static str,
        identifier: String,
    },

    /// An item file exists but does not contain valid JSON
    #[error("invalid JSON file: {path}: {detail}")]
    InvalidFormat { path: PathBuf, detail: String },

    /// A rename template is malformed
    #[error("template error: {0}")]
    Template(String),

    /// The remote API collaborator failed
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A strictly projected field is absent from an entry
    #[error("missing field '{field}' in {context}")]
    MissingField {
        field: String,
        context: &'static str,
    },

    /// A server-info key is absent
    #[error("server info has no entry '{0}'")]
    MissingKey(String),

    /// An operation was given a payload of the wrong shape
    #[error("payload error: {0}")]
    Payload(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors outside item files
    #[error("JSON error: {0}")]
    Json(String),
}

impl VaultError {
    /// Create a "not found" error for an item file, with name/id context
    /// when both are known
    pub fn item_not_found(
        item_type: &'static str,
        item_name: Option<&str>,
        item_id: Option<&str>,
    ) -> Self {
        let identifier = match (item_name, item_id) {
            (Some(name), Some(id)) => format!("{}, {}", name, id),
            _ => "file missing".to_string(),
        };
        Self::NotFound {
            item_type,
            identifier,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an invalid-format error
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, Self::InvalidFormat { .. })
    }

    /// Check if this is a template error
    pub fn is_template(&self) -> bool {
        matches!(self, Self::Template(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for netvault operations
pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::Template("test error".into());
        assert_eq!(err.to_string(), "template error: test error");
    }

    #[test]
    fn test_not_found_with_detail() {
        let err = VaultError::item_not_found(
            "device template",
            Some("Branch_A"),
            Some("11111111-1111-1111-1111-111111111111"),
        );
        assert_eq!(
            err.to_string(),
            "device template not found: Branch_A, 11111111-1111-1111-1111-111111111111"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_not_found_without_detail() {
        let err = VaultError::item_not_found("device template", None, None);
        assert_eq!(err.to_string(), "device template not found: file missing");
    }

    #[test]
    fn test_invalid_format_display() {
        let err = VaultError::InvalidFormat {
            path: PathBuf::from("data/node1/bad.json"),
            detail: "expected value at line 1 column 1".into(),
        };
        assert!(err
            .to_string()
            .starts_with("invalid JSON file: data/node1/bad.json"));
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let vault_err: VaultError = io_err.into();
        assert!(matches!(vault_err, VaultError::Io(_)));
    }
}
