//! File-system record store backing the disk tier of both caches.

use crate::core::{CacheError, Result, StoreError};
use crate::storage::codec::Codec;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// One file per key under a single root folder.
///
/// Records are written once through a temp file that is renamed into place, so a
/// reader either sees a complete record or no record at all.
#[derive(Debug, Clone)]
pub struct PersistentStore {
    root: PathBuf,
}

impl PersistentStore {
    /// Opens the store, creating the root folder if it is missing.
    ///
    /// Fails with [`CacheError::Configuration`] when the folder cannot be
    /// created, is not a directory, or cannot be listed.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| {
                CacheError::configuration(&root, format!("Can not create folder ({})", e))
            })?;
        }
        if !root.is_dir() {
            return Err(CacheError::configuration(&root, "Not a folder"));
        }
        fs::read_dir(&root).map_err(|e| {
            CacheError::configuration(&root, format!("Can not read folder ({})", e))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the record stored under `key`.
    pub fn path_for(&self, key: &str) -> std::result::Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    pub fn exists(&self, key: &str) -> std::result::Result<bool, StoreError> {
        let path = self.path_for(key)?;
        path.try_exists().map_err(|e| StoreError::io(&path, e))
    }

    pub fn read(&self, key: &str) -> std::result::Result<Vec<u8>, StoreError> {
        let path = self.path_for(key)?;
        let mut file = File::open(&path).map_err(|e| StoreError::io(&path, e))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| StoreError::io(&path, e))?;
        Ok(data)
    }

    pub fn write(&self, key: &str, bytes: &[u8]) -> std::result::Result<(), StoreError> {
        let path = self.path_for(key)?;
        let temp_file = NamedTempFile::new_in(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        let mut writer = BufWriter::new(temp_file);
        writer.write_all(bytes).map_err(|e| StoreError::io(&path, e))?;
        let temp_file = writer
            .into_inner()
            .map_err(|e| StoreError::io(&path, e.into_error()))?;
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| StoreError::io(&path, e))?;
        temp_file
            .persist(&path)
            .map_err(|e| StoreError::io(&path, e.error))?;
        Ok(())
    }

    pub fn load<T: DeserializeOwned, C: Codec>(
        &self,
        codec: &C,
        key: &str,
    ) -> std::result::Result<T, StoreError> {
        let data = self.read(key)?;
        codec.decode(&data)
    }

    pub fn save<T: Serialize, C: Codec>(
        &self,
        codec: &C,
        key: &str,
        value: &T,
    ) -> std::result::Result<(), StoreError> {
        let data = codec.encode(value)?;
        self.write(key, &data)
    }

    /// Record file names currently in the store, sorted.
    pub fn keys(&self) -> std::result::Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| StoreError::io(entry.path(), e))?
                .is_file();
            let name = entry.file_name().to_string_lossy().into_owned();
            // in-progress temp files are dot-prefixed
            if is_file && !name.starts_with('.') {
                keys.push(name);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn validate_key(key: &str) -> std::result::Result<(), StoreError> {
    if key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\', '\0'])
        || key.contains("..")
    {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
