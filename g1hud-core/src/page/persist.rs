//! Page state persistence
//!
//! The record is serialized with postcard under [`StorageKey::PageState`].
//! The page is stored by name so that a renamed or removed page degrades to
//! the default page instead of invalidating the whole record.

use g1hud_hal::{KeyValueStorage, StorageError, StorageKey};
use heapless::String;
use serde::{Deserialize, Serialize};

use super::state::{Page, PageState};

/// Magic number to identify a valid record
pub const PAGE_RECORD_MAGIC: u32 = 0x4731_4844; // "G1HD"

/// Current record format version
pub const PAGE_RECORD_VERSION: u8 = 1;

/// Longest stored page name
pub const MAX_PAGE_NAME_LEN: usize = 16;

/// Upper bound on the encoded record size
pub const MAX_RECORD_SIZE: usize = 32;

/// Errors while loading or saving page state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Backing store failed
    Storage(StorageError),
    /// Record could not be encoded
    Encode,
    /// Stored bytes are not a record
    Decode,
    /// Magic or version mismatch
    InvalidFormat,
}

impl From<StorageError> for PersistError {
    fn from(err: StorageError) -> Self {
        PersistError::Storage(err)
    }
}

/// On-disk form of [`PageState`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Magic number for validation
    pub magic: u32,
    /// Record format version
    pub version: u8,
    /// Page name
    pub page: String<MAX_PAGE_NAME_LEN>,
    pub display_on: bool,
}

impl PageRecord {
    /// Build a record for a state
    pub fn from_state(state: &PageState) -> Self {
        let mut page = String::new();
        // Every page name is shorter than MAX_PAGE_NAME_LEN
        let _ = page.push_str(state.page.name());
        Self {
            magic: PAGE_RECORD_MAGIC,
            version: PAGE_RECORD_VERSION,
            page,
            display_on: state.display_on,
        }
    }

    /// Check if the header matches this build
    pub fn is_valid(&self) -> bool {
        self.magic == PAGE_RECORD_MAGIC && self.version == PAGE_RECORD_VERSION
    }

    /// Resolve into a state; unknown page names select the default page
    pub fn to_state(&self) -> PageState {
        PageState {
            page: Page::from_name_or_default(&self.page),
            display_on: self.display_on,
        }
    }
}

/// Read the persisted page state
pub fn load_page_state<S: KeyValueStorage>(storage: &mut S) -> Result<PageState, PersistError> {
    let mut buffer = [0u8; MAX_RECORD_SIZE];
    let len = storage.read(StorageKey::PageState, &mut buffer)?;
    let record: PageRecord =
        postcard::from_bytes(&buffer[..len]).map_err(|_| PersistError::Decode)?;
    if !record.is_valid() {
        return Err(PersistError::InvalidFormat);
    }
    Ok(record.to_state())
}

/// Write the page state
pub fn save_page_state<S: KeyValueStorage>(
    storage: &mut S,
    state: &PageState,
) -> Result<(), PersistError> {
    let mut buffer = [0u8; MAX_RECORD_SIZE];
    let record = PageRecord::from_state(state);
    let bytes = postcard::to_slice(&record, &mut buffer).map_err(|_| PersistError::Encode)?;
    storage.write(StorageKey::PageState, bytes)?;
    Ok(())
}

/// How the startup state was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadOutcome {
    /// A valid record was found
    Loaded,
    /// Nothing was stored; defaults were written
    Initialized,
    /// The stored record was unusable; defaults were written over it
    Reset(PersistError),
    /// Defaults are in use but could not be written
    Unsaved(PersistError),
}

/// Load the page state, creating the default record when none is usable
///
/// Never fails: the returned state is always usable, the outcome says how
/// it was obtained.
pub fn load_or_init<S: KeyValueStorage>(storage: &mut S) -> (PageState, LoadOutcome) {
    match load_page_state(storage) {
        Ok(state) => (state, LoadOutcome::Loaded),
        Err(err) => {
            let state = PageState::default();
            let outcome = match save_page_state(storage, &state) {
                Err(save_err) => LoadOutcome::Unsaved(save_err),
                Ok(()) if err == PersistError::Storage(StorageError::NotFound) => {
                    LoadOutcome::Initialized
                }
                Ok(()) => LoadOutcome::Reset(err),
            };
            (state, outcome)
        }
    }
}
