//! # Hotel Records
//!
//! A hotel is a schema-less JSON object. Only `id`, `slug` and `title` are
//! required at creation; every other field is preserved verbatim across
//! merges.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};

/// Fields that must be present and non-empty when a record is created.
const REQUIRED_FIELDS: [&str; 3] = ["id", "slug", "title"];

/// A single hotel record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hotel {
    fields: Map<String, Value>,
}

impl Hotel {
    /// Wraps a JSON value, rejecting anything that is not an object.
    pub fn from_value(value: Value) -> StoreResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(StoreError::NotAnObject),
        }
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    /// Primary key; immutable once created.
    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// Secondary human-readable identifier.
    pub fn slug(&self) -> Option<&str> {
        self.str_field("slug")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    /// Image references in stored order. An absent or malformed `images`
    /// field reads as empty.
    pub fn images(&self) -> Vec<String> {
        self.fields
            .get("images")
            .and_then(|v| v.as_array())
            .map(|refs| {
                refs.iter()
                    .filter_map(|r| r.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Checks the fields required at creation.
    pub fn validate_new(&self) -> StoreResult<()> {
        for field in REQUIRED_FIELDS {
            match self.str_field(field) {
                Some(s) if !s.is_empty() => {}
                _ => return Err(StoreError::MissingField(field)),
            }
        }
        Ok(())
    }

    /// Shallow merge: every top-level field in `partial` overwrites the
    /// corresponding field here; fields absent from `partial` are kept,
    /// `images` included.
    pub fn merge(&mut self, partial: &Map<String, Value>) {
        for (key, value) in partial {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Appends references to `images` in the order given, initializing the
    /// field to an empty array if absent.
    pub fn append_images(&mut self, references: &[String]) {
        let images = self
            .fields
            .entry("images".to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !images.is_array() {
            *images = Value::Array(Vec::new());
        }
        if let Value::Array(items) = images {
            items.extend(references.iter().map(|r| Value::String(r.clone())));
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}
