//! # API Responses
//!
//! Transport-independent response envelope: an HTTP-like status code plus
//! a JSON body, ready for a collaborator to encode onto the wire.

use serde_json::{json, Value};

use crate::hotels::StoreError;

/// Status and body pair returned to the collaborator layer
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Create a success response
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// Create a created response
    pub fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    /// Create an error response from a store error
    pub fn error(err: &StoreError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }

    /// Check if this is a success response
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
