//! # Attachment Manager
//!
//! Appends upload-derived reference strings to a record's image list,
//! loading and re-saving through the store. Attachment is logically
//! "append", never "replace".

use std::sync::Arc;

use crate::hotels::{Hotel, HotelStore, StoreResult};

use super::assets::AssetStore;

/// Attachment operations over a shared store
pub struct AttachmentManager {
    store: Arc<HotelStore>,
    assets: AssetStore,
}

impl AttachmentManager {
    pub fn new(store: Arc<HotelStore>, assets: AssetStore) -> Self {
        Self { store, assets }
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Appends `references` to the record's images in the order given.
    pub fn attach(&self, key: &str, references: &[String]) -> StoreResult<Hotel> {
        self.store.append_images(key, references)
    }

    /// Saves each `(file_name, bytes)` upload to the asset store, then
    /// attaches the resulting references in upload order.
    pub fn store_uploads(&self, key: &str, uploads: &[(String, Vec<u8>)]) -> StoreResult<Hotel> {
        let mut references = Vec::with_capacity(uploads.len());
        for (file_name, data) in uploads {
            references.push(self.assets.save(file_name, data)?.reference);
        }
        self.attach(key, &references)
    }
}
