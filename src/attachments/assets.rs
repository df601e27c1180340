//! # Asset Store
//!
//! Persists upload bytes under the assets directory and hands out the
//! public reference paths that get recorded on hotel records. Serving the
//! bytes back is a collaborator's job, not ours.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::hotels::{write_atomic, StoreError, StoreResult};

/// Metadata for one stored upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAsset {
    /// Name of the file on disk (timestamp-prefixed)
    pub file_name: String,
    /// Public reference path recorded on hotel records
    pub reference: String,
    pub size: u64,
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

/// Filesystem store for uploaded image assets
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
    public_prefix: String,
}

impl AssetStore {
    /// Opens the assets directory, creating it if missing.
    pub fn new(dir: PathBuf, public_prefix: impl Into<String>) -> StoreResult<Self> {
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Io(format!(
                "Failed to create asset directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        Ok(Self {
            dir,
            public_prefix: public_prefix.into(),
        })
    }

    /// SHA-256 hex checksum of asset data.
    pub fn calculate_checksum(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }

    /// Client-supplied names may carry path components or shell noise; keep
    /// only the final path segment and a conservative character set.
    fn sanitize_name(file_name: &str) -> String {
        let base = file_name
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or(file_name);
        let cleaned: String = base
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        if cleaned.is_empty() {
            "upload".to_string()
        } else {
            cleaned
        }
    }

    /// Stores upload bytes under a timestamped name and returns the asset
    /// metadata, including its public reference path.
    pub fn save(&self, file_name: &str, data: &[u8]) -> StoreResult<StoredAsset> {
        let created_at = Utc::now();
        let stored_name = format!(
            "{}_{}",
            created_at.timestamp_millis(),
            Self::sanitize_name(file_name)
        );

        let target = self.dir.join(&stored_name);
        write_atomic(&target, data)?;

        Ok(StoredAsset {
            reference: format!(
                "{}/{}",
                self.public_prefix.trim_end_matches('/'),
                stored_name
            ),
            file_name: stored_name,
            size: data.len() as u64,
            checksum: Self::calculate_checksum(data),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(temp: &TempDir) -> AssetStore {
        AssetStore::new(temp.path().join("uploads"), "/uploads").unwrap()
    }

    #[test]
    fn test_save_writes_bytes_and_reference() {
        let temp = TempDir::new().unwrap();
        let assets = open(&temp);

        let asset = assets.save("front.png", b"png bytes").unwrap();
        assert!(asset.reference.starts_with("/uploads/"));
        assert!(asset.reference.ends_with("_front.png"));
        assert_eq!(asset.size, 9);

        let on_disk = std::fs::read(temp.path().join("uploads").join(&asset.file_name)).unwrap();
        assert_eq!(on_disk, b"png bytes");
    }

    #[test]
    fn test_checksum_is_sha256_hex() {
        let checksum = AssetStore::calculate_checksum(b"test");
        assert_eq!(checksum.len(), 64);
    }

    #[test]
    fn test_sanitize_strips_paths() {
        assert_eq!(
            AssetStore::sanitize_name("../../etc/passwd"),
            "passwd".to_string()
        );
        assert_eq!(
            AssetStore::sanitize_name("C:\\photos\\room 1.png"),
            "room_1.png".to_string()
        );
        assert_eq!(AssetStore::sanitize_name("photos/"), "upload".to_string());
    }
}
