/// Track domain type
use crate::error::EncoreError;
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// URI scheme marking session-scoped resources
pub const TRANSIENT_SCHEME: &str = "blob:";

/// Opaque reference to a loadable media byte source
///
/// Transient handles (`blob:` URIs) only live for the current session and are
/// exclusively owned by the track that created them. They must be released
/// when the track is removed and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceHandle {
    /// Remote or file-backed resource that survives the session
    Remote(String),

    /// Session-scoped resource (`blob:` URI)
    Transient(String),
}

impl ResourceHandle {
    /// Create a remote handle
    pub fn remote(uri: impl Into<String>) -> Self {
        Self::Remote(uri.into())
    }

    /// Create a transient handle, adding the `blob:` scheme if missing
    pub fn transient(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        if uri.starts_with(TRANSIENT_SCHEME) {
            Self::Transient(uri)
        } else {
            Self::Transient(format!("{TRANSIENT_SCHEME}{uri}"))
        }
    }

    /// Full URI of the resource
    pub fn uri(&self) -> &str {
        match self {
            Self::Remote(uri) | Self::Transient(uri) => uri,
        }
    }

    /// Whether this handle dies with the session
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl TryFrom<String> for ResourceHandle {
    type Error = EncoreError;

    fn try_from(uri: String) -> Result<Self, Self::Error> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            return Err(EncoreError::invalid_resource("empty resource uri"));
        }
        if trimmed.starts_with(TRANSIENT_SCHEME) {
            Ok(Self::Transient(trimmed.to_string()))
        } else {
            Ok(Self::Remote(trimmed.to_string()))
        }
    }
}

impl From<ResourceHandle> for String {
    fn from(handle: ResourceHandle) -> Self {
        match handle {
            ResourceHandle::Remote(uri) | ResourceHandle::Transient(uri) => uri,
        }
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

/// Playlist entry
///
/// Field names on the wire match the stored playlist format
/// (`duration`, `src`, `cover`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier, immutable after creation
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: String,

    /// Display duration ("m:ss")
    #[serde(rename = "duration", default = "default_duration_label")]
    pub duration_label: String,

    /// Playable media
    #[serde(rename = "src")]
    pub source: ResourceHandle,

    /// Cover art
    #[serde(default)]
    pub cover: Option<ResourceHandle>,
}

fn default_duration_label() -> String {
    format_time(0.0)
}

impl Track {
    /// Create a new track with a freshly generated id
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        source: ResourceHandle,
    ) -> Self {
        Self {
            id: TrackId::generate(),
            title: title.into(),
            artist: artist.into(),
            album: album.into(),
            duration_label: default_duration_label(),
            source,
            cover: None,
        }
    }

    /// Set the display duration
    #[must_use]
    pub fn with_duration_label(mut self, label: impl Into<String>) -> Self {
        self.duration_label = label.into();
        self
    }

    /// Set the cover art
    #[must_use]
    pub fn with_cover(mut self, cover: ResourceHandle) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Whether the track can be written to the persisted playlist
    pub fn is_persistable(&self) -> bool {
        !self.source.is_transient()
    }

    /// Case-insensitive search match on title, artist, or album
    ///
    /// `needle` must already be trimmed and lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.artist.to_lowercase().contains(needle)
            || self.album.to_lowercase().contains(needle)
    }
}

/// Format seconds as `m:ss`
///
/// Non-finite, zero and negative inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
