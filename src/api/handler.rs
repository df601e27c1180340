//! # API Handler
//!
//! The collaborator-facing surface. A transport layer decodes its inbound
//! request into a key and a JSON document, calls one method here, and
//! encodes the returned `(status, body)` pair. This module neither parses
//! uploads nor serves assets.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::attachments::{AssetStore, AttachmentManager};
use crate::config::StoreConfig;
use crate::hotels::{HotelStore, StoreResult};

use super::response::ApiResponse;

/// Hotel operations mapped to status/body pairs
pub struct HotelApi {
    store: Arc<HotelStore>,
    attachments: AttachmentManager,
}

impl HotelApi {
    /// Opens the store and asset directories described by `config`.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let store = Arc::new(HotelStore::open(config)?);
        let assets = AssetStore::new(config.assets_dir.clone(), config.public_prefix.clone())?;
        let attachments = AttachmentManager::new(store.clone(), assets);

        Ok(Self { store, attachments })
    }

    pub fn store(&self) -> &HotelStore {
        &self.store
    }

    /// Create a new hotel from a decoded request body.
    pub fn create(&self, document: Value) -> ApiResponse {
        match self.store.create(document) {
            Ok(hotel) => ApiResponse::created(hotel.as_value()),
            Err(e) => ApiResponse::error(&e),
        }
    }

    /// Fetch a hotel by id or slug.
    pub fn get(&self, key: &str) -> ApiResponse {
        match self.store.get(key) {
            Ok(hotel) => ApiResponse::ok(hotel.as_value()),
            Err(e) => ApiResponse::error(&e),
        }
    }

    /// Merge a partial document into an existing hotel.
    pub fn update(&self, key: &str, document: Value) -> ApiResponse {
        match self.store.update(key, document) {
            Ok(hotel) => ApiResponse::ok(hotel.as_value()),
            Err(e) => ApiResponse::error(&e),
        }
    }

    /// Append already-stored reference paths to a hotel's images.
    pub fn attach(&self, key: &str, references: &[String]) -> ApiResponse {
        match self.attachments.attach(key, references) {
            Ok(hotel) => ApiResponse::ok(hotel.as_value()),
            Err(e) => ApiResponse::error(&e),
        }
    }

    /// Persist upload bytes and append the resulting references.
    pub fn upload(&self, key: &str, uploads: &[(String, Vec<u8>)]) -> ApiResponse {
        match self.attachments.store_uploads(key, uploads) {
            Ok(hotel) => ApiResponse::ok(hotel.as_value()),
            Err(e) => ApiResponse::error(&e),
        }
    }

    /// List all known hotel ids.
    pub fn list_ids(&self) -> ApiResponse {
        match self.store.list_ids() {
            Ok(ids) => ApiResponse::ok(json!({ "ids": ids })),
            Err(e) => ApiResponse::error(&e),
        }
    }
}
