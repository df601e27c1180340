//! # Key Index
//!
//! The record-file directory is the single source of truth for which keys
//! exist. The aggregate document (`data.json`) is a derived cache: it is
//! rebuilt from a full directory scan at store open or on demand, and is
//! never written from the per-record write path. A crash therefore cannot
//! leave the two views permanently diverged.

use serde_json::Value;

use super::codec;
use super::errors::{StoreError, StoreResult};
use super::files::{write_atomic, RecordFiles};
use super::record::Hotel;

/// Authoritative view of the currently-existing record keys
#[derive(Debug, Clone)]
pub struct KeyIndex {
    files: RecordFiles,
}

impl KeyIndex {
    pub fn new(files: RecordFiles) -> Self {
        Self { files }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.files.exists(key)
    }

    /// All known keys, sorted.
    pub fn list(&self) -> StoreResult<Vec<String>> {
        self.files.list_keys()
    }

    /// Regenerates the aggregate cache from a full directory scan and
    /// returns the number of records it now mirrors.
    ///
    /// Every record is decoded; a corrupt document fails the rebuild
    /// instead of being dropped from the cache.
    pub fn rebuild_aggregate(&self) -> StoreResult<usize> {
        let keys = self.files.list_keys()?;

        let mut records = Vec::with_capacity(keys.len());
        for key in &keys {
            let bytes = self.files.read(key)?;
            let hotel = codec::decode(&bytes).map_err(|e| match e {
                StoreError::Corrupt(msg) => StoreError::Corrupt(format!("{}: {}", key, msg)),
                other => other,
            })?;
            records.push(hotel.as_value());
        }

        let count = records.len();
        let bytes = serde_json::to_vec_pretty(&Value::Array(records))
            .map_err(|e| StoreError::Internal(format!("Failed to serialize aggregate: {}", e)))?;
        write_atomic(&self.files.aggregate_path(), &bytes)?;

        Ok(count)
    }

    /// Materializes one record file per aggregate entry that has no file
    /// yet, for importing a legacy aggregate-only data set. Existing record
    /// files win over their aggregate entries and are left untouched.
    ///
    /// Returns how many record files were written. A missing aggregate is
    /// an empty import, not an error.
    pub fn seed_from_aggregate(&self) -> StoreResult<usize> {
        let path = self.files.aggregate_path();
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(StoreError::Io(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let entries: Value = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupt(format!("aggregate: {}", e)))?;
        let entries = match entries {
            Value::Array(entries) => entries,
            _ => {
                return Err(StoreError::Corrupt(
                    "aggregate root is not a JSON array".to_string(),
                ))
            }
        };

        let mut written = 0;
        for entry in entries {
            let hotel = Hotel::from_value(entry).map_err(|_| {
                StoreError::Corrupt("aggregate entry is not a JSON object".to_string())
            })?;
            let id = hotel
                .id()
                .ok_or_else(|| StoreError::Corrupt("aggregate entry has no id".to_string()))?
                .to_string();

            if self.files.exists(&id) {
                continue;
            }

            let bytes = codec::encode(&hotel)?;
            self.files.write(&id, &bytes)?;
            written += 1;
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn setup(temp: &TempDir) -> (RecordFiles, KeyIndex) {
        let files = RecordFiles::new(temp.path().to_path_buf()).unwrap();
        let index = KeyIndex::new(files.clone());
        (files, index)
    }

    fn write_record(files: &RecordFiles, id: &str) {
        let hotel = Hotel::from_value(json!({"id": id, "slug": id, "title": id})).unwrap();
        files.write(id, &codec::encode(&hotel).unwrap()).unwrap();
    }

    #[test]
    fn test_exists_and_list_follow_directory() {
        let temp = TempDir::new().unwrap();
        let (files, index) = setup(&temp);

        assert!(!index.exists("h1"));
        write_record(&files, "h1");
        write_record(&files, "h2");

        assert!(index.exists("h1"));
        assert_eq!(index.list().unwrap(), vec!["h1", "h2"]);
    }

    #[test]
    fn test_rebuild_aggregate_mirrors_records() {
        let temp = TempDir::new().unwrap();
        let (files, index) = setup(&temp);

        write_record(&files, "h2");
        write_record(&files, "h1");

        let count = index.rebuild_aggregate().unwrap();
        assert_eq!(count, 2);

        let aggregate: Value =
            serde_json::from_slice(&fs::read(files.aggregate_path()).unwrap()).unwrap();
        let ids: Vec<&str> = aggregate
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e.get("id").unwrap().as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["h1", "h2"]);
    }

    #[test]
    fn test_rebuild_fails_on_corrupt_record() {
        let temp = TempDir::new().unwrap();
        let (files, index) = setup(&temp);

        write_record(&files, "h1");
        fs::write(temp.path().join("h2.json"), b"{ not json").unwrap();

        let result = index.rebuild_aggregate();
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_seed_materializes_missing_files_only() {
        let temp = TempDir::new().unwrap();
        let (files, index) = setup(&temp);

        write_record(&files, "h1");
        let aggregate = json!([
            {"id": "h1", "title": "already on disk"},
            {"id": "h2", "slug": "second", "title": "Second"}
        ]);
        fs::write(
            files.aggregate_path(),
            serde_json::to_vec_pretty(&aggregate).unwrap(),
        )
        .unwrap();

        let written = index.seed_from_aggregate().unwrap();
        assert_eq!(written, 1);

        // the existing h1 file was not clobbered by its aggregate entry
        let h1 = codec::decode(&files.read("h1").unwrap()).unwrap();
        assert_eq!(h1.title(), Some("h1"));

        let h2 = codec::decode(&files.read("h2").unwrap()).unwrap();
        assert_eq!(h2.slug(), Some("second"));
    }

    #[test]
    fn test_seed_without_aggregate_is_empty() {
        let temp = TempDir::new().unwrap();
        let (_files, index) = setup(&temp);
        assert_eq!(index.seed_from_aggregate().unwrap(), 0);
    }

    #[test]
    fn test_seed_rejects_entry_without_id() {
        let temp = TempDir::new().unwrap();
        let (files, index) = setup(&temp);

        fs::write(files.aggregate_path(), b"[{\"title\": \"no id\"}]").unwrap();
        assert!(matches!(
            index.seed_from_aggregate(),
            Err(StoreError::Corrupt(_))
        ));
    }
}
