//! Playback Events
//!
//! Three layers of events flow through the player:
//! - [`MediaSignal`]: raw lifecycle signals from the media backend, tagged
//!   with the session they were issued for
//! - [`TransportEvent`]: signals the transport accepted for its current
//!   session
//! - [`PlayerEvent`]: UI refresh notifications drained by the host

use serde::{Deserialize, Serialize};

/// Lifecycle signal reported by a media backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MediaSignal {
    /// The backend started fetching the resource
    LoadStarted,

    /// Duration became known
    MetadataReady { duration: f64 },

    /// Enough data is buffered to play through
    ReadyToPlay,

    /// Periodic playback position
    TimeUpdate { position: f64 },

    /// Playback reached the end of the resource
    Ended,

    /// The resource failed to load or decode
    Error { reason: String },

    /// A start request was refused after the fact (e.g. autoplay policy)
    PlayRejected { reason: String },
}

/// Event the transport accepted for its current session
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    LoadStarted,
    MetadataReady(f64),
    PositionChanged(f64),
    Ended,
    Error(String),
    ReadyToPlay,
    PlayRejected(String),
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Events emitted by the player for UI synchronization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlayerEvent {
    /// Selection changed (`None` when nothing is selected or visible)
    TrackChanged {
        /// Position in the filtered view
        index: Option<usize>,
        /// Identity of the selected track
        track_id: Option<String>,
    },

    /// Playing/paused changed
    StateChanged {
        /// Whether audio is playing
        playing: bool,
    },

    /// Position update, suppressed while the user scrubs
    Progress {
        /// Current position in seconds
        position: f64,
        /// Duration in seconds, when known
        duration: Option<f64>,
    },

    /// Duration of the loaded track became known
    DurationChanged {
        /// Duration in seconds
        duration: f64,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// Level in [0, 1]
        level: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// Playlist or filtered view changed
    PlaylistChanged {
        /// Number of tracks in the playlist
        total: usize,
        /// Number of tracks visible under the current search
        visible: usize,
    },

    /// Shuffle flag changed
    ShuffleChanged {
        /// Whether shuffle is on
        enabled: bool,
    },

    /// Repeat mode changed
    RepeatChanged {
        /// "off", "all" or "one"
        mode: String,
    },

    /// UI theme changed
    ThemeChanged {
        /// "dark" or "light"
        theme: String,
    },

    /// Message for the notification area
    Notice {
        /// Severity
        level: NoticeLevel,
        /// Human-readable message
        message: String,
    },
}

impl PlayerEvent {
    /// Build a notice event
    pub fn notice(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self::Notice {
            level,
            message: message.into(),
        }
    }
}
