//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// All media-layer failures are caught at the load sequencer boundary and end
/// in one of two outcomes: suppressed because a cancellation is in flight, or
/// surfaced to the user with the player back in a safe idle/paused state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// The medium refused to start (autoplay policy, unsupported format)
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// The resource failed to load or decode
    #[error("Media load error: {0}")]
    MediaLoad(String),

    /// Play/next/previous with nothing to play
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Load or remove with an index outside the filtered view
    #[error("Index out of range: {index} (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
