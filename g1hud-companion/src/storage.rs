//! File-backed preference storage
//!
//! One file per [`StorageKey`] in the data directory. Writes go to a
//! temporary file first and are renamed into place, so a crash never
//! leaves a half-written record behind.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use g1hud_hal::{KeyValueStorage, StorageError, StorageKey};
use log::{debug, warn};

/// [`KeyValueStorage`] over a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.dir.join(key.name())
    }

    fn write_atomic(&self, key: StorageKey, data: &[u8]) -> io::Result<()> {
        let path = self.path(key);
        let temp_path = path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &path)
    }
}

fn storage_error(err: &io::Error) -> StorageError {
    match err.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound,
        _ => StorageError::Io,
    }
}

impl KeyValueStorage for FileStorage {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let data = fs::read(self.path(key)).map_err(|e| storage_error(&e))?;
        if data.len() > buffer.len() {
            return Err(StorageError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        self.write_atomic(key, data).map_err(|e| {
            warn!("Failed to write {}: {}", key.name(), e);
            storage_error(&e)
        })?;
        debug!("Saved {} ({} bytes)", key.name(), data.len());
        Ok(())
    }
}
