//! # Hotel Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Hotel store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    // Validation errors
    #[error("Hotel document must be a JSON object")]
    NotAnObject,

    #[error("Missing required hotel field: {0}")]
    MissingField(&'static str),

    #[error("Hotel ID cannot be changed")]
    ImmutableId,

    #[error("Invalid record key: {0}")]
    InvalidKey(String),

    // Key errors
    #[error("Hotel ID already exists: {0}")]
    DuplicateId(String),

    #[error("Hotel not found")]
    NotFound(String),

    // Storage integrity
    #[error("Corrupt record document: {0}")]
    Corrupt(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotAnObject => 400,
            StoreError::MissingField(_) => 400,
            StoreError::ImmutableId => 400,
            StoreError::InvalidKey(_) => 400,
            StoreError::DuplicateId(_) => 409,
            StoreError::NotFound(_) => 404,
            StoreError::Corrupt(_) => 500,
            StoreError::Io(_) => 500,
            StoreError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StoreError::MissingField("title").status_code(), 400);
        assert_eq!(StoreError::DuplicateId("h1".into()).status_code(), 409);
        assert_eq!(StoreError::NotFound("h1".into()).status_code(), 404);
        assert_eq!(StoreError::Corrupt("bad json".into()).status_code(), 500);
    }

    #[test]
    fn test_not_found_message() {
        let err = StoreError::NotFound("h1".into());
        assert_eq!(err.to_string(), "Hotel not found");
    }
}
