//! g1hud I/O abstraction layer
//!
//! This crate defines the traits the scheduler core needs from the outside
//! world. The host companion implements them over files and sockets; tests
//! implement them in memory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  g1hud-core (scheduler, transport)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  g1hud-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ console link  │       │  TCP bridge   │
//! │ file storage  │       │     link      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`link::PacketLink`], [`link::PacketSource`] - Wireless packet link
//! - [`storage::KeyValueStorage`] - Persistent preference storage

#![no_std]
#![deny(unsafe_code)]

pub mod link;
pub mod storage;

pub use link::{ConnectionState, LinkError, PacketLink, PacketSource};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError, StorageKey};
