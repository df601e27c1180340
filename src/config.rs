//! # Store Configuration
//!
//! Explicit configuration for the record and asset directories, passed to
//! the store at construction. Nothing in the crate reads process-wide
//! state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding one JSON document per hotel (default: "./data")
    #[serde(default = "default_record_dir")]
    pub record_dir: PathBuf,

    /// Directory holding uploaded image assets (default: "./uploads")
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Public path prefix for attachment references (default: "/uploads")
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
}

fn default_record_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_public_prefix() -> String {
    "/uploads".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            record_dir: default_record_dir(),
            assets_dir: default_assets_dir(),
            public_prefix: default_public_prefix(),
        }
    }
}

impl StoreConfig {
    /// Roots both directories under `base`. Used by embedders and tests.
    pub fn under(base: &Path) -> Self {
        Self {
            record_dir: base.join("data"),
            assets_dir: base.join("uploads"),
            public_prefix: default_public_prefix(),
        }
    }
}
