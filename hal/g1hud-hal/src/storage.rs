//! Preference storage abstractions
//!
//! Provides a small key-value store for user preferences. Implementations
//! decide where the bytes live (a file per key on the host, RAM in tests).

use heapless::Vec;

/// Storage keys for persisted data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Selected page and display-on flag (postcard record)
    PageState = 0,
}

/// Number of distinct storage keys
pub const STORAGE_KEY_COUNT: usize = 1;

impl StorageKey {
    /// Slot index of the key
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable name, used as a file name by file-backed stores
    pub const fn name(self) -> &'static str {
        match self {
            StorageKey::PageState => "page_state",
        }
    }
}

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Backing medium failed
    Io,
    /// Storage is full
    Full,
}

/// Key-value storage trait
///
/// Writes replace the previous value for the key.
pub trait KeyValueStorage {
    /// Read a value by key into the provided buffer
    ///
    /// Returns the number of bytes read.
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value by key
    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError>;
}

/// In-memory storage with `N` bytes per key
///
/// Contents are lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage<const N: usize> {
    slots: [Option<Vec<u8, N>>; STORAGE_KEY_COUNT],
}

impl<const N: usize> MemoryStorage<N> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }
}

impl<const N: usize> KeyValueStorage for MemoryStorage<N> {
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let slot = self.slots[key.index()]
            .as_ref()
            .ok_or(StorageError::NotFound)?;
        if buffer.len() < slot.len() {
            return Err(StorageError::BufferTooSmall);
        }
        buffer[..slot.len()].copy_from_slice(slot);
        Ok(slot.len())
    }

    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), StorageError> {
        let value = Vec::from_slice(data).map_err(|_| StorageError::Full)?;
        self.slots[key.index()] = Some(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_missing_key() {
        let mut storage = MemoryStorage::<16>::new();
        let mut buf = [0u8; 16];
        assert_eq!(
            storage.read(StorageKey::PageState, &mut buf),
            Err(StorageError::NotFound)
        );
    }

    #[test]
    fn test_memory_storage_overwrite() {
        let mut storage = MemoryStorage::<16>::new();
        storage.write(StorageKey::PageState, &[1, 2, 3]).unwrap();
        storage.write(StorageKey::PageState, &[9]).unwrap();

        let mut buf = [0u8; 16];
        let len = storage.read(StorageKey::PageState, &mut buf).unwrap();
        assert_eq!(&buf[..len], &[9]);
    }

    #[test]
    fn test_memory_storage_limits() {
        let mut storage = MemoryStorage::<4>::new();
        assert_eq!(
            storage.write(StorageKey::PageState, &[0; 5]),
            Err(StorageError::Full)
        );

        storage.write(StorageKey::PageState, &[1, 2, 3, 4]).unwrap();
        let mut small = [0u8; 2];
        assert_eq!(
            storage.read(StorageKey::PageState, &mut small),
            Err(StorageError::BufferTooSmall)
        );
    }
}
