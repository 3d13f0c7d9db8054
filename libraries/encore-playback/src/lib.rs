//! Encore - Playback Management
//!
//! Platform-agnostic playlist and playback control for the Encore player.
//!
//! This crate provides:
//! - Track store with an order-preserving search view
//! - Transport wrapping one media resource behind [`MediaBackend`]
//! - Load sequencing with session invalidation and cancellation
//! - Shuffle, repeat (off/all/one), seeking and progress scrubbing
//! - Volume and mute
//! - UI refresh events drained by the host
//!
//! # Architecture
//!
//! `encore-playback` performs no I/O of its own:
//! - The medium is a [`MediaBackend`] (a browser audio element through the
//!   `wasm` feature, or [`SimulatedBackend`])
//! - Persistence and resource cleanup are the
//!   [`encore_core::PlayerPersistence`] and [`encore_core::ResourceReleaser`]
//!   seams
//!
//! Everything is single-threaded and event-driven. Backend signals carry the
//! [`SessionId`] of the load they belong to; signals from superseded loads
//! are ignored.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use encore_core::{ResourceHandle, Track};
//! use encore_playback::{Player, PlayerConfig, SimulatedBackend};
//!
//! let mut player = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default());
//!
//! player.add(vec![
//!     Track::new("Roads", "Portishead", "Dummy", ResourceHandle::remote("https://example.com/roads.mp3")),
//!     Track::new("Teardrop", "Massive Attack", "Mezzanine", ResourceHandle::remote("https://example.com/teardrop.mp3")),
//! ]);
//! player.pump();
//! assert_eq!(player.current_index(), Some(0));
//!
//! player.toggle_play_pause().unwrap();
//! assert!(player.is_playing());
//!
//! player.next().unwrap();
//! player.pump();
//! assert_eq!(player.current_index(), Some(1));
//! assert!(player.is_playing());
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use encore_core::RepeatMode;
//! use encore_playback::{Player, PlayerConfig, SimulatedBackend};
//!
//! let mut player = Player::new(SimulatedBackend::new(), PlayerConfig::default());
//!
//! player.set_shuffle(true);
//! player.set_repeat(RepeatMode::All);
//! assert_eq!(player.cycle_repeat(), RepeatMode::One);
//! ```

mod error;
pub mod events;
mod player;
pub mod sequencer;
mod shuffle;
mod simulated;
pub mod store;
pub mod transport;
pub mod types;
mod volume;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::{MediaSignal, NoticeLevel, PlayerEvent, TransportEvent};
pub use player::Player;
pub use sequencer::{LoadSequencer, LoadState, PendingLoad};
pub use shuffle::pick_next_index;
pub use simulated::SimulatedBackend;
pub use store::TrackStore;
pub use transport::{MediaBackend, Transport, TransportState};
pub use types::{PlayerConfig, SessionId};
pub use volume::Volume;
