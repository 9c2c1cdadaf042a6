//! Page selection
//!
//! The user picks one page at a time; the display can be switched off
//! independently. Both survive a restart through the preference store.

pub mod persist;
pub mod state;

pub use persist::{load_or_init, load_page_state, save_page_state, LoadOutcome, PageRecord, PersistError};
pub use state::{Page, PageState, UnknownPage};
