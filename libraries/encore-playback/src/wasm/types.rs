//! WASM-compatible type definitions

use encore_core::{format_time, EncoreError, ResourceHandle, Track, TrackId};
use serde::{Deserialize, Serialize};

/// Track as exchanged with the page
///
/// Everything but `title` and `src` is optional on input: a missing id is
/// generated, missing artist/album fall back to "Unknown …", and a missing
/// duration shows as `0:00`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WasmTrack {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    album: Option<String>,
    #[serde(default)]
    duration: Option<String>,
    src: String,
    #[serde(default)]
    cover: Option<String>,
}

impl TryFrom<WasmTrack> for Track {
    type Error = EncoreError;

    fn try_from(track: WasmTrack) -> Result<Self, Self::Error> {
        let source = ResourceHandle::try_from(track.src)?;
        let mut converted = Track::new(
            track.title,
            track.artist.unwrap_or_else(|| "Unknown Artist".to_string()),
            track.album.unwrap_or_else(|| "Unknown Album".to_string()),
            source,
        )
        .with_duration_label(track.duration.unwrap_or_else(|| format_time(0.0)));

        if let Some(id) = track.id.filter(|id| !id.is_empty()) {
            converted.id = TrackId::new(id);
        }
        if let Some(cover) = track.cover {
            converted = converted.with_cover(ResourceHandle::try_from(cover)?);
        }
        Ok(converted)
    }
}

impl From<&Track> for WasmTrack {
    fn from(track: &Track) -> Self {
        Self {
            id: Some(track.id.as_str().to_string()),
            title: track.title.clone(),
            artist: Some(track.artist.clone()),
            album: Some(track.album.clone()),
            duration: Some(track.duration_label.clone()),
            src: track.source.uri().to_string(),
            cover: track.cover.as_ref().map(|c| c.uri().to_string()),
        }
    }
}
