//! # Hotel Store
//!
//! Orchestrates codec, record files, key index and per-key locks. The
//! store exclusively owns the on-disk representation; callers only hold
//! the transient copies returned from `get`, which do not track later
//! changes.
//!
//! Reads take no lock: atomic file replacement guarantees a reader sees a
//! whole document. Create, update and attach serialize per key, which
//! closes the lost-update race the underlying read-modify-write cycle
//! would otherwise have.

use serde_json::Value;

use crate::config::StoreConfig;

use super::codec;
use super::errors::{StoreError, StoreResult};
use super::files::RecordFiles;
use super::index::KeyIndex;
use super::locks::KeyLockManager;
use super::record::Hotel;

/// Record store for hotel documents
#[derive(Debug)]
pub struct HotelStore {
    files: RecordFiles,
    index: KeyIndex,
    locks: KeyLockManager,
}

impl HotelStore {
    /// Opens the store, creating the record directory if missing and
    /// rebuilding the aggregate cache from a full directory scan.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let files = RecordFiles::new(config.record_dir.clone())?;
        let index = KeyIndex::new(files.clone());
        index.rebuild_aggregate()?;

        Ok(Self {
            files,
            index,
            locks: KeyLockManager::new(),
        })
    }

    /// Creates a new record.
    ///
    /// Requires `id`, `slug` and `title` to be present and non-empty, the
    /// id to be a safe key, and the id to be unused. Returns the stored
    /// copy.
    pub fn create(&self, document: Value) -> StoreResult<Hotel> {
        let hotel = Hotel::from_value(document)?;
        hotel.validate_new()?;

        let id = match hotel.id() {
            Some(id) => id.to_string(),
            None => return Err(StoreError::MissingField("id")),
        };
        self.files.path_for(&id)?;

        let bytes = codec::encode(&hotel)?;

        let lock = self.locks.lock_for(&id)?;
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::Internal(format!("Record lock poisoned: {}", id)))?;

        if self.index.exists(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        self.files.write(&id, &bytes)?;

        Ok(hotel)
    }

    /// Fetches a record by id, falling back to slug lookup.
    pub fn get(&self, key: &str) -> StoreResult<Hotel> {
        match self.load(key) {
            Ok(hotel) => Ok(hotel),
            Err(StoreError::NotFound(_)) => self.find_by_slug(key),
            Err(e) => Err(e),
        }
    }

    /// Shallow-merges `partial` into the stored record and persists the
    /// result, all under the key's lock.
    ///
    /// Fields absent from `partial` are preserved, `images` included. The
    /// stored id cannot change; a `partial` carrying a different `id` is
    /// rejected. Resolution is by id only.
    pub fn update(&self, key: &str, partial: Value) -> StoreResult<Hotel> {
        let partial = match partial {
            Value::Object(map) => map,
            _ => return Err(StoreError::NotAnObject),
        };

        let lock = self.locks.lock_for(key)?;
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::Internal(format!("Record lock poisoned: {}", key)))?;

        let mut hotel = self.load(key)?;

        if let Some(new_id) = partial.get("id") {
            if hotel.fields().get("id") != Some(new_id) {
                return Err(StoreError::ImmutableId);
            }
        }

        hotel.merge(&partial);
        self.persist(&hotel)?;

        Ok(hotel)
    }

    /// Appends attachment references to the record's images, in order,
    /// under the key's lock. Append only; existing references stay.
    pub(crate) fn append_images(&self, key: &str, references: &[String]) -> StoreResult<Hotel> {
        let lock = self.locks.lock_for(key)?;
        let _guard = lock
            .lock()
            .map_err(|_| StoreError::Internal(format!("Record lock poisoned: {}", key)))?;

        let mut hotel = self.load(key)?;
        hotel.append_images(references);
        self.persist(&hotel)?;

        Ok(hotel)
    }

    /// All known record ids, sorted.
    pub fn list_ids(&self) -> StoreResult<Vec<String>> {
        self.index.list()
    }

    /// Imports a legacy aggregate document into per-record files. See
    /// [`KeyIndex::seed_from_aggregate`].
    pub fn seed_from_aggregate(&self) -> StoreResult<usize> {
        self.index.seed_from_aggregate()
    }

    /// Regenerates the aggregate cache on demand.
    pub fn refresh_aggregate(&self) -> StoreResult<usize> {
        self.index.rebuild_aggregate()
    }

    fn load(&self, id: &str) -> StoreResult<Hotel> {
        let bytes = self.files.read(id)?;
        codec::decode(&bytes).map_err(|e| match e {
            StoreError::Corrupt(msg) => StoreError::Corrupt(format!("{}: {}", id, msg)),
            other => other,
        })
    }

    fn find_by_slug(&self, slug: &str) -> StoreResult<Hotel> {
        for key in self.index.list()? {
            let hotel = self.load(&key)?;
            if hotel.slug() == Some(slug) {
                return Ok(hotel);
            }
        }
        Err(StoreError::NotFound(slug.to_string()))
    }

    fn persist(&self, hotel: &Hotel) -> StoreResult<()> {
        let id = match hotel.id() {
            Some(id) => id,
            None => return Err(StoreError::MissingField("id")),
        };
        let bytes = codec::encode(hotel)?;
        self.files.write(id, &bytes)
    }
}
