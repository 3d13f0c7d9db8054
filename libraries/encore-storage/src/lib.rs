//! Encore Storage
//!
//! Durable player state for Encore, kept as string key/value pairs.
//!
//! # Architecture
//!
//! - **Backends**: [`KeyValueStore`] with [`MemoryStore`] and [`JsonFileStore`]
//! - **Adapter**: [`KeyValuePersistence`] implements
//!   [`encore_core::PlayerPersistence`], validating every entry on read
//!
//! # Example
//!
//! ```rust
//! use encore_core::{PlayerPersistence, RepeatMode};
//! use encore_storage::{KeyValuePersistence, MemoryStore};
//!
//! let mut persistence = KeyValuePersistence::new(MemoryStore::new());
//! persistence.save_repeat(RepeatMode::All).unwrap();
//! persistence.save_volume(0.4).unwrap();
//!
//! let settings = persistence.load().unwrap();
//! assert_eq!(settings.repeat, RepeatMode::All);
//! assert_eq!(settings.volume, 0.4);
//! ```

mod error;
pub mod persistence;
pub mod store;

pub use error::{Result, StorageError};
pub use persistence::KeyValuePersistence;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
