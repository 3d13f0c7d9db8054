//! Persistence adapter
//!
//! Maps the player's durable state onto string keys. Reads validate every
//! entry on its own: a malformed entry is logged and replaced by its default
//! without discarding the rest.

use crate::store::KeyValueStore;
use encore_core::{
    PersistedSettings, PlayerPersistence, RepeatMode, ResourceHandle, Theme, Track,
    DEFAULT_VOLUME,
};
use tracing::{debug, warn};

// Storage key constants
/// UI theme ("dark" or "light")
pub const KEY_THEME: &str = "theme";

/// JSON array of tracks without transient resources
pub const KEY_PLAYLIST: &str = "playlist";

/// Selected playlist position (stringified integer)
pub const KEY_CURRENT_INDEX: &str = "currentTrackIndex";

/// Volume in [0, 1] (stringified float)
pub const KEY_VOLUME: &str = "volume";

/// Shuffle flag ("true" or "false")
pub const KEY_SHUFFLE: &str = "shuffle";

/// Repeat mode code (0 = off, 1 = all, 2 = one)
pub const KEY_REPEAT: &str = "repeat";

// Session-scoped cover art does not survive a restart
fn drop_transient_cover(mut track: Track) -> Track {
    if track.cover.as_ref().is_some_and(ResourceHandle::is_transient) {
        debug!(track = %track.id, "Dropping transient cover");
        track.cover = None;
    }
    track
}

/// [`PlayerPersistence`] over any [`KeyValueStore`]
#[derive(Debug)]
pub struct KeyValuePersistence<S> {
    store: S,
}

impl<S: KeyValueStore> KeyValuePersistence<S> {
    /// Wrap a store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }

    fn read_theme(&self) -> encore_core::Result<Theme> {
        Ok(match self.store.get(KEY_THEME)? {
            None => Theme::default(),
            Some(raw) => Theme::parse(raw.trim()).unwrap_or_else(|| {
                warn!(key = KEY_THEME, value = %raw, "Invalid theme, using default");
                Theme::default()
            }),
        })
    }

    fn read_playlist(&self) -> encore_core::Result<Vec<Track>> {
        let Some(raw) = self.store.get(KEY_PLAYLIST)? else {
            return Ok(Vec::new());
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(key = KEY_PLAYLIST, error = %e, "Unreadable playlist, starting empty");
                return Ok(Vec::new());
            }
        };

        let total = entries.len();
        let tracks: Vec<Track> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Track>(entry) {
                Ok(track) if track.is_persistable() => Some(drop_transient_cover(track)),
                Ok(track) => {
                    debug!(track = %track.id, "Dropping transient track from saved playlist");
                    None
                }
                Err(e) => {
                    warn!(key = KEY_PLAYLIST, error = %e, "Skipping malformed track");
                    None
                }
            })
            .collect();

        if tracks.len() != total {
            debug!(kept = tracks.len(), total, "Saved playlist repaired");
        }
        Ok(tracks)
    }

    fn read_current_index(&self) -> encore_core::Result<Option<usize>> {
        Ok(match self.store.get(KEY_CURRENT_INDEX)? {
            None => None,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(index) => usize::try_from(index).ok(),
                Err(_) => {
                    warn!(key = KEY_CURRENT_INDEX, value = %raw, "Invalid index, ignoring");
                    None
                }
            },
        })
    }

    fn read_volume(&self) -> encore_core::Result<f32> {
        Ok(match self.store.get(KEY_VOLUME)? {
            None => DEFAULT_VOLUME,
            Some(raw) => match raw.trim().parse::<f32>() {
                Ok(volume) if volume.is_finite() => {
                    if !(0.0..=1.0).contains(&volume) {
                        warn!(key = KEY_VOLUME, volume, "Volume out of range, clamping");
                    }
                    volume.clamp(0.0, 1.0)
                }
                _ => {
                    warn!(key = KEY_VOLUME, value = %raw, "Invalid volume, using default");
                    DEFAULT_VOLUME
                }
            },
        })
    }

    fn read_shuffle(&self) -> encore_core::Result<bool> {
        Ok(match self.store.get(KEY_SHUFFLE)? {
            None => false,
            Some(raw) => raw.trim().parse::<bool>().unwrap_or_else(|_| {
                warn!(key = KEY_SHUFFLE, value = %raw, "Invalid shuffle flag, using default");
                false
            }),
        })
    }

    fn read_repeat(&self) -> encore_core::Result<RepeatMode> {
        Ok(match self.store.get(KEY_REPEAT)? {
            None => RepeatMode::default(),
            Some(raw) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(RepeatMode::from_code)
                .unwrap_or_else(|| {
                    warn!(key = KEY_REPEAT, value = %raw, "Invalid repeat mode, using default");
                    RepeatMode::default()
                }),
        })
    }
}

impl<S: KeyValueStore> PlayerPersistence for KeyValuePersistence<S> {
    fn load(&mut self) -> encore_core::Result<PersistedSettings> {
        Ok(PersistedSettings {
            theme: self.read_theme()?,
            playlist: self.read_playlist()?,
            current_index: self.read_current_index()?,
            volume: self.read_volume()?,
            shuffle: self.read_shuffle()?,
            repeat: self.read_repeat()?,
        })
    }

    fn save_playlist(&mut self, tracks: &[Track]) -> encore_core::Result<()> {
        let persistable: Vec<Track> = tracks
            .iter()
            .filter(|t| t.is_persistable())
            .cloned()
            .map(drop_transient_cover)
            .collect();
        let json = serde_json::to_string(&persistable)?;
        self.store.set(KEY_PLAYLIST, &json)?;
        Ok(())
    }

    fn save_current_index(&mut self, index: Option<usize>) -> encore_core::Result<()> {
        match index {
            Some(index) => self.store.set(KEY_CURRENT_INDEX, &index.to_string())?,
            None => self.store.remove(KEY_CURRENT_INDEX)?,
        }
        Ok(())
    }

    fn save_volume(&mut self, volume: f32) -> encore_core::Result<()> {
        self.store
            .set(KEY_VOLUME, &volume.clamp(0.0, 1.0).to_string())?;
        Ok(())
    }

    fn save_shuffle(&mut self, shuffle: bool) -> encore_core::Result<()> {
        self.store.set(KEY_SHUFFLE, &shuffle.to_string())?;
        Ok(())
    }

    fn save_repeat(&mut self, repeat: RepeatMode) -> encore_core::Result<()> {
        self.store.set(KEY_REPEAT, &repeat.code().to_string())?;
        Ok(())
    }

    fn save_theme(&mut self, theme: Theme) -> encore_core::Result<()> {
        self.store.set(KEY_THEME, theme.as_str())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn empty_store_yields_defaults() {
        let mut persistence = KeyValuePersistence::new(MemoryStore::new());
        assert_eq!(persistence.load().unwrap(), PersistedSettings::default());
    }

    #[test]
    fn malformed_entries_are_repaired_individually() {
        let store = MemoryStore::with_entries([
            (KEY_THEME, "purple"),
            (KEY_VOLUME, "loud"),
            (KEY_SHUFFLE, "true"),
            (KEY_REPEAT, "7"),
            (KEY_CURRENT_INDEX, "abc"),
            (KEY_PLAYLIST, "not json"),
        ]);
        let settings = KeyValuePersistence::new(store).load().unwrap();

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.volume, DEFAULT_VOLUME);
        assert!(settings.shuffle);
        assert_eq!(settings.repeat, RepeatMode::Off);
        assert_eq!(settings.current_index, None);
        assert!(settings.playlist.is_empty());
    }

    #[test]
    fn out_of_range_volume_is_clamped() {
        let store = MemoryStore::with_entries([(KEY_VOLUME, "1.8")]);
        let settings = KeyValuePersistence::new(store).load().unwrap();
        assert_eq!(settings.volume, 1.0);
    }

    #[test]
    fn negative_index_means_no_selection() {
        let store = MemoryStore::with_entries([(KEY_CURRENT_INDEX, "-1")]);
        let settings = KeyValuePersistence::new(store).load().unwrap();
        assert_eq!(settings.current_index, None);
    }

    #[test]
    fn clearing_selection_removes_key() {
        let mut persistence = KeyValuePersistence::new(MemoryStore::new());
        persistence.save_current_index(Some(3)).unwrap();
        assert_eq!(persistence.store().get(KEY_CURRENT_INDEX).unwrap().as_deref(), Some("3"));

        persistence.save_current_index(None).unwrap();
        assert_eq!(persistence.store().get(KEY_CURRENT_INDEX).unwrap(), None);
    }

    #[test]
    fn transient_cover_is_not_saved() {
        let mut persistence = KeyValuePersistence::new(MemoryStore::new());
        let track = Track::new(
            "Song",
            "Artist",
            "Album",
            ResourceHandle::remote("https://music.test/song.mp3"),
        )
        .with_cover(ResourceHandle::transient("encore/1"));
        let id = track.id.clone();
        persistence.save_playlist(&[track]).unwrap();

        let raw = persistence.store().get(KEY_PLAYLIST).unwrap().unwrap();
        assert!(!raw.contains("blob:"), "saved playlist holds a transient cover: {raw}");

        let settings = persistence.load().unwrap();
        assert_eq!(settings.playlist.len(), 1);
        assert_eq!(settings.playlist[0].id, id);
        assert_eq!(settings.playlist[0].cover, None);
    }

    #[test]
    fn remote_cover_is_kept() {
        let mut persistence = KeyValuePersistence::new(MemoryStore::new());
        let cover = ResourceHandle::remote("https://music.test/cover.jpg");
        let track = Track::new(
            "Song",
            "Artist",
            "Album",
            ResourceHandle::remote("https://music.test/song.mp3"),
        )
        .with_cover(cover.clone());
        persistence.save_playlist(&[track]).unwrap();

        let settings = persistence.load().unwrap();
        assert_eq!(settings.playlist[0].cover, Some(cover));
    }

    #[test]
    fn stored_transient_cover_is_dropped_on_read() {
        let store = MemoryStore::with_entries([(
            KEY_PLAYLIST,
            r#"[{"id":"a","title":"Song","artist":"Artist","album":"Album","duration":"1:00","src":"https://music.test/a.mp3","cover":"blob:encore/9"}]"#,
        )]);
        let settings = KeyValuePersistence::new(store).load().unwrap();

        assert_eq!(settings.playlist.len(), 1);
        assert_eq!(settings.playlist[0].cover, None);
    }

    #[test]
    fn repeat_is_stored_as_code() {
        let mut persistence = KeyValuePersistence::new(MemoryStore::new());
        persistence.save_repeat(RepeatMode::One).unwrap();
        assert_eq!(persistence.store().get(KEY_REPEAT).unwrap().as_deref(), Some("2"));
    }
}
