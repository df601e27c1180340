//! # Record Files
//!
//! Maps record keys to files in the storage directory and performs the raw
//! reads and writes. Writes go through a temp file and an atomic rename, so
//! a reader observes either the old or the new content in full.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use regex::Regex;

use super::errors::{StoreError, StoreResult};

/// Reserved aggregate cache file name, excluded from key listings.
pub const AGGREGATE_FILE: &str = "data.json";

/// Suffix of record document files.
const RECORD_SUFFIX: &str = ".json";

/// Keys become file names, so they are restricted to a filesystem-safe
/// alphabet. The leading character must be alphanumeric, which rules out
/// dotfiles and any path-relative spelling.
const KEY_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._-]*$";

const MAX_KEY_LEN: usize = 128;

/// Record file access for one storage directory
#[derive(Debug, Clone)]
pub struct RecordFiles {
    dir: PathBuf,
    key_pattern: Regex,
}

impl RecordFiles {
    /// Opens the storage directory, creating it if missing.
    pub fn new(dir: PathBuf) -> StoreResult<Self> {
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Io(format!(
                "Failed to create record directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let key_pattern = Regex::new(KEY_PATTERN)
            .map_err(|e| StoreError::Internal(format!("Invalid key pattern: {}", e)))?;

        Ok(Self { dir, key_pattern })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the aggregate cache document.
    pub fn aggregate_path(&self) -> PathBuf {
        self.dir.join(AGGREGATE_FILE)
    }

    /// Returns whether `key` may name a record file.
    pub fn is_valid_key(&self, key: &str) -> bool {
        key.len() <= MAX_KEY_LEN && self.key_pattern.is_match(key)
    }

    /// Resolves the storage location for `key`, rejecting unsafe keys.
    pub fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        if !self.is_valid_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}{}", key, RECORD_SUFFIX)))
    }

    /// Persists record bytes atomically.
    pub fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let target = self.path_for(key)?;
        write_atomic(&target, bytes)
    }

    /// Reads record bytes. A key that cannot name a file cannot have a
    /// record, so invalid keys map to `NotFound` like missing files do.
    pub fn read(&self, key: &str) -> StoreResult<Vec<u8>> {
        let target = match self.path_for(key) {
            Ok(path) => path,
            Err(StoreError::InvalidKey(_)) => return Err(StoreError::NotFound(key.to_string())),
            Err(e) => return Err(e),
        };

        fs::read(&target).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(key.to_string())
            } else {
                StoreError::Io(e.to_string())
            }
        })
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.exists()).unwrap_or(false)
    }

    /// All record keys in the storage directory, sorted, excluding the
    /// reserved aggregate file and anything that is not a record document.
    pub fn list_keys(&self) -> StoreResult<Vec<String>> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| StoreError::Io(format!("Failed to scan {}: {}", self.dir.display(), e)))?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io(e.to_string()))?;
            if let Some(name) = entry.file_name().to_str() {
                if name == AGGREGATE_FILE {
                    continue;
                }
                if let Some(stem) = name.strip_suffix(RECORD_SUFFIX) {
                    if self.is_valid_key(stem) {
                        keys.push(stem.to_string());
                    }
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// Write-to-temp-then-rename. The temp file is fsynced before the swap so
/// the rename never installs partially written bytes.
pub(crate) fn write_atomic(target: &Path, bytes: &[u8]) -> StoreResult<()> {
    let mut tmp_name = target.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    {
        let mut file = fs::File::create(&tmp)
            .map_err(|e| StoreError::Io(format!("Failed to create {}: {}", tmp.display(), e)))?;
        file.write_all(bytes)
            .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", tmp.display(), e)))?;
        file.sync_all()
            .map_err(|e| StoreError::Io(format!("fsync failed for {}: {}", tmp.display(), e)))?;
    }

    fs::rename(&tmp, target)
        .map_err(|e| StoreError::Io(format!("Failed to replace {}: {}", target.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(temp: &TempDir) -> RecordFiles {
        RecordFiles::new(temp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_write_read() {
        let temp = TempDir::new().unwrap();
        let files = open(&temp);

        files.write("h1", b"{\"id\": \"h1\"}").unwrap();
        let data = files.read("h1").unwrap();
        assert_eq!(data, b"{\"id\": \"h1\"}");
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let temp = TempDir::new().unwrap();
        let files = open(&temp);

        let result = files.read("nonexistent");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_unsafe_keys_rejected_on_write() {
        let temp = TempDir::new().unwrap();
        let files = open(&temp);

        for key in ["../escape", "a/b", "", ".hidden", "a b"] {
            assert!(
                matches!(files.write(key, b"{}"), Err(StoreError::InvalidKey(_))),
                "key {:?} should be rejected",
                key
            );
        }
    }

    #[test]
    fn test_unsafe_keys_read_as_not_found() {
        let temp = TempDir::new().unwrap();
        let files = open(&temp);

        let result = files.read("../../etc/passwd");
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert!(!files.exists("../../etc/passwd"));
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let temp = TempDir::new().unwrap();
        let files = open(&temp);

        files.write("h1", b"old").unwrap();
        files.write("h1", b"new").unwrap();
        assert_eq!(files.read("h1").unwrap(), b"new");

        // the temp file must not survive the swap
        assert!(!temp.path().join("h1.json.tmp").exists());
    }

    #[test]
    fn test_list_keys_sorted_and_filtered() {
        let temp = TempDir::new().unwrap();
        let files = open(&temp);

        files.write("h2", b"{}").unwrap();
        files.write("h1", b"{}").unwrap();
        fs::write(temp.path().join(AGGREGATE_FILE), b"[]").unwrap();
        fs::write(temp.path().join("h3.json.tmp"), b"{}").unwrap();
        fs::write(temp.path().join("notes.txt"), b"ignore").unwrap();

        assert_eq!(files.list_keys().unwrap(), vec!["h1", "h2"]);
    }
}
