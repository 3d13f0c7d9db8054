//! WASM bindings for encore-playback
//!
//! Exposes the player to a browser page. The page supplies a media element
//! adapter and, optionally, `window.localStorage`; lifecycle events of the
//! audio element are forwarded back through `WasmPlayer::notify`.

#[cfg(feature = "wasm")]
pub mod host;

#[cfg(feature = "wasm")]
pub mod player;

#[cfg(feature = "wasm")]
pub mod types;

#[cfg(feature = "wasm")]
pub use player::WasmPlayer;

#[cfg(feature = "wasm")]
pub use types::WasmTrack;
