use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{CacheError, Result};

/// Environment variable naming the cache root folder.
pub const ROOT_ENV: &str = "TYPECACHE_ROOT";
/// Environment variable holding the optional descriptor file prefix.
pub const PREFIX_ENV: &str = "TYPECACHE_PREFIX";

/// What the metadata aggregator writes after a source lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataPersistence {
    /// Each group file holds only that group's structs.
    #[default]
    GroupDelta,
    /// Each newly written group file holds the whole aggregate built so far.
    AggregateSnapshot,
}

/// Cache configuration
///
/// Shared by [`DescriptorCache`](super::DescriptorCache) and
/// [`MetadataAggregator`](crate::metadata::MetadataAggregator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Folder holding the persisted records
    pub root_folder: PathBuf,

    /// Prefix for descriptor record file names
    #[serde(default)]
    pub file_prefix: Option<String>,

    #[serde(default)]
    pub metadata_persistence: MetadataPersistence,
}

impl CacheConfig {
    pub fn new<P: AsRef<Path>>(root_folder: P) -> Self {
        Self {
            root_folder: root_folder.as_ref().to_path_buf(),
            file_prefix: None,
            metadata_persistence: MetadataPersistence::default(),
        }
    }

    /// Set the descriptor file prefix
    pub fn file_prefix(mut self, prefix: &str) -> Self {
        self.file_prefix = Some(prefix.to_string());
        self
    }

    /// Set the metadata persistence policy
    pub fn metadata_persistence(mut self, persistence: MetadataPersistence) -> Self {
        self.metadata_persistence = persistence;
        self
    }

    /// Prefix to apply. Blank prefixes are ignored; others are used verbatim.
    pub fn effective_prefix(&self) -> Option<&str> {
        self.file_prefix
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }

    /// Load from `TYPECACHE_ROOT` and `TYPECACHE_PREFIX`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::var_os(ROOT_ENV), env::var(PREFIX_ENV).ok())
    }

    /// Build from already-read `TYPECACHE_ROOT` / `TYPECACHE_PREFIX` values.
    pub fn from_vars(root: Option<OsString>, prefix: Option<String>) -> Result<Self> {
        let root = root.ok_or_else(|| {
            CacheError::configuration(PathBuf::new(), format!("{} is not set", ROOT_ENV))
        })?;
        let mut config = Self::new(PathBuf::from(root));
        if let Some(prefix) = prefix {
            config = config.file_prefix(&prefix);
        }
        Ok(config)
    }
}
