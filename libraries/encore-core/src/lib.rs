//! Encore Core
//!
//! Platform-agnostic core types, collaborator traits, and error handling for
//! the Encore player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `ResourceHandle`, `TrackId`, `RepeatMode`, `Theme`
//! - **Persisted shape**: `PersistedSettings`, validated and default-filled on read
//! - **Collaborator Traits**: `PlayerPersistence`, `ResourceReleaser`
//! - **Error Handling**: Unified `EncoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use encore_core::{format_time, ResourceHandle, Track};
//!
//! let track = Track::new(
//!     "My Favorite Song",
//!     "Some Artist",
//!     "Some Album",
//!     ResourceHandle::remote("https://example.com/song.mp3"),
//! )
//! .with_duration_label(format_time(185.0));
//!
//! assert_eq!(track.duration_label, "3:05");
//! assert!(track.is_persistable());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{EncoreError, Result};
pub use traits::{PlayerPersistence, ResourceReleaser};
pub use types::{
    format_time, PersistedSettings, RepeatMode, ResourceHandle, Theme, Track, TrackId,
    DEFAULT_VOLUME,
};
