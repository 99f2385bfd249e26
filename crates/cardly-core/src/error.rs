//! Error types for the card sharing core.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing card state.
#[derive(Error, Debug)]
pub enum Error {
    /// The backing key-value store refused the operation (quota, access, ...).
    #[error("storage error: {0}")]
    Storage(String),

    /// SQLite backend error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON encoding/decoding error for a stored value.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (creating the database directory, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A requested vanity slug failed validation.
    #[error("invalid slug '{slug}': {reason}")]
    InvalidSlug {
        /// The rejected slug.
        slug: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_display() {
        let err = Error::Storage("quota exceeded".to_string());
        assert_eq!(err.to_string(), "storage error: quota exceeded");
    }

    #[test]
    fn test_invalid_slug_display() {
        let err = Error::InvalidSlug {
            slug: "a".to_string(),
            reason: "too short".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'a'"));
        assert!(msg.contains("too short"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
