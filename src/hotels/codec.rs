//! # Record Codec
//!
//! Records are stored as pretty-printed JSON so the on-disk documents stay
//! inspectable. Decoding is strict: malformed bytes fail with `Corrupt` and
//! never yield a partially populated record.

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::record::Hotel;

/// Encodes a record for storage.
pub fn encode(hotel: &Hotel) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(hotel)
        .map_err(|e| StoreError::Internal(format!("Failed to serialize record: {}", e)))
}

/// Decodes record bytes read from storage.
pub fn decode(bytes: &[u8]) -> StoreResult<Hotel> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    match value {
        Value::Object(_) => Hotel::from_value(value),
        _ => Err(StoreError::Corrupt(
            "record root is not a JSON object".to_string(),
        )),
    }
}
