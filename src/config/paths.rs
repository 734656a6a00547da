//! Path management for the local data store
//!
//! Backups for each controller node live under `<root>/<node_dir>/`, where
//! the root defaults to `data/` in the working directory.
//!
//! ## Root Resolution Order
//!
//! 1. `NETVAULT_DATA_DIR` environment variable (if set)
//! 2. `data/` relative to the current working directory

use std::path::{Path, PathBuf};

/// Default top-level directory for the local data store
pub const DATA_DIR: &str = "data";

/// Resolves store locations under the data root
#[derive(Debug, Clone)]
pub struct StorePaths {
    root: PathBuf,
}

impl StorePaths {
    /// Create a new StorePaths instance
    ///
    /// Root resolution:
    /// 1. `NETVAULT_DATA_DIR` env var (explicit override)
    /// 2. `data/` in the current working directory
    pub fn new() -> Self {
        let root = std::env::var("NETVAULT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DATA_DIR));

        Self { root }
    }

    /// Create StorePaths with a custom root directory (useful for testing)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the directory holding all files backed up from one controller node
    pub fn node_dir(&self, node_dir: &str) -> PathBuf {
        self.root.join(node_dir)
    }
}

impl Default for StorePaths {
    fn default() -> Self {
        Self::new()
    }
}
