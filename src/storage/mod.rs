//! Storage layer for persisted module state
//!
//! Persistence itself belongs to the host; this module provides the snapshot
//! types the resolvers consume plus two stock collaborators: an in-memory store
//! and a JSON file store.

pub mod file;
pub mod memory;
pub mod snapshot;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use snapshot::{FlagSnapshot, SettingsSnapshot, StateSnapshot};
