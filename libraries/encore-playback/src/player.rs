//! Player - core orchestration
//!
//! Coordinates the track store, transport, load sequencer, shuffle, repeat,
//! volume and persistence. Every user intent enters through a method here;
//! every backend signal enters through [`Player::handle_signal`]. UI refresh
//! notifications accumulate in a queue the host drains after each call.

use crate::{
    error::{PlaybackError, Result},
    events::{MediaSignal, NoticeLevel, PlayerEvent, TransportEvent},
    sequencer::{ErrorDisposition, LoadSequencer, LoadState, ReadyOutcome},
    shuffle::pick_next_index,
    store::TrackStore,
    transport::{MediaBackend, Transport, TransportState},
    types::{PlayerConfig, SessionId},
    volume::Volume,
};
use encore_core::{
    PersistedSettings, PlayerPersistence, RepeatMode, ResourceReleaser, Theme, Track, TrackId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

const EMPTY_PLAYLIST_NOTICE: &str = "No songs in playlist. Add some music first!";
const PLAY_FAILED_NOTICE: &str = "Error playing audio. Please try another file.";
const LOAD_FAILED_NOTICE: &str = "Error playing audio file";
const WELCOME_NOTICE: &str = "Welcome! Add your music files to get started.";

/// Audio player controller
///
/// Owns one playlist and one transport. Single-threaded: the host calls into
/// it from its event loop and forwards backend signals with their session.
pub struct Player<B: MediaBackend> {
    store: TrackStore,
    transport: Transport<B>,
    sequencer: LoadSequencer,

    // Selection by identity; the visible index is derived from the store
    selection: Option<TrackId>,

    shuffle: bool,
    repeat: RepeatMode,
    theme: Theme,
    config: PlayerConfig,

    persistence: Option<Box<dyn PlayerPersistence>>,
    releaser: Option<Box<dyn ResourceReleaser>>,
    rng: StdRng,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl<B: MediaBackend> Player<B> {
    /// Create a player around a media backend
    pub fn new(backend: B, config: PlayerConfig) -> Self {
        Self {
            store: TrackStore::new(),
            transport: Transport::new(backend, Volume::new(config.initial_volume)),
            sequencer: LoadSequencer::new(),
            selection: None,
            shuffle: false,
            repeat: RepeatMode::Off,
            theme: Theme::default(),
            config,
            persistence: None,
            releaser: None,
            rng: StdRng::from_entropy(),
            pending_events: Vec::new(),
        }
    }

    /// Attach a persistence adapter
    pub fn with_persistence(mut self, persistence: Box<dyn PlayerPersistence>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Attach a releaser for transient resources
    pub fn with_releaser(mut self, releaser: Box<dyn ResourceReleaser>) -> Self {
        self.releaser = Some(releaser);
        self
    }

    /// Seed the shuffle generator (deterministic hosts and tests)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Apply persisted settings once at startup
    ///
    /// Restores volume, shuffle, repeat and theme, then the playlist, and
    /// selects the saved index (or the first track) without autoplay. A
    /// failing store is logged and the defaults are kept.
    pub fn restore(&mut self) {
        if !self.config.persist {
            return;
        }
        let Some(persistence) = self.persistence.as_mut() else {
            return;
        };

        let settings = match persistence.load() {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Failed to read persisted settings, using defaults");
                PersistedSettings::default()
            }
        };
        info!(
            tracks = settings.playlist.len(),
            volume = settings.volume,
            shuffle = settings.shuffle,
            repeat = %settings.repeat,
            "Restoring player state"
        );

        self.transport.set_volume(settings.volume);
        self.shuffle = settings.shuffle;
        self.repeat = settings.repeat;
        self.theme = settings.theme;
        self.emit_volume_changed();
        self.emit(PlayerEvent::ShuffleChanged {
            enabled: self.shuffle,
        });
        self.emit(PlayerEvent::RepeatChanged {
            mode: self.repeat.as_str().to_string(),
        });
        self.emit(PlayerEvent::ThemeChanged {
            theme: self.theme.as_str().to_string(),
        });

        if settings.playlist.is_empty() {
            self.emit_playlist_changed();
            self.notice(NoticeLevel::Success, WELCOME_NOTICE);
            return;
        }

        self.store.add(settings.playlist);
        self.emit_playlist_changed();

        let index = settings
            .current_index
            .filter(|&i| i < self.store.len())
            .unwrap_or(0);
        if let Err(e) = self.load_track(index, false) {
            debug!(error = %e, "Saved selection not restorable");
        }
    }

    // ===== Playlist =====

    /// Append tracks to the playlist
    ///
    /// Selects the first track (without autoplay) when the playlist was empty
    /// and nothing is selected.
    pub fn add(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }

        let was_empty = self.store.is_empty();
        let message = match tracks.as_slice() {
            [only] => format!("Added \"{}\" to playlist", only.title),
            many => format!("Added {} songs to playlist", many.len()),
        };
        info!(count = tracks.len(), "Adding tracks");

        self.store.add(tracks);
        self.persist_playlist();
        self.emit_playlist_changed();
        self.notice(NoticeLevel::Success, message);

        if was_empty && self.selection.is_none() {
            self.select_first();
        }
    }

    /// Remove the track at a visible position
    ///
    /// Returns the removed track, or `None` when the index is outside the
    /// filtered view.
    pub fn remove(&mut self, filtered_index: usize) -> Option<Track> {
        let previous_index = self.current_index();
        let removed_selected = previous_index == Some(filtered_index);
        let keep_playing = self.transport.is_playing()
            || self.sequencer.pending().is_some_and(|p| p.autoplay);

        let Some(track) = self.store.remove(filtered_index) else {
            debug!(index = filtered_index, "Remove outside visible range ignored");
            return None;
        };
        info!(track = %track.id, title = %track.title, "Removed track");
        self.release(&track);

        if removed_selected {
            let visible = self.store.visible_len();
            if visible > 0 {
                if let Err(e) = self.load_track(filtered_index.min(visible - 1), keep_playing) {
                    debug!(error = %e, "Neighbour of removed track not loadable");
                }
            } else {
                self.stop_and_deselect();
            }
        } else if self.current_index() != previous_index {
            self.emit_track_changed();
        }

        self.persist_playlist();
        self.persist_current_index();
        self.emit_playlist_changed();
        self.notice(NoticeLevel::Success, format!("Removed \"{}\"", track.title));
        Some(track)
    }

    /// Filter the visible view by a search term
    pub fn search(&mut self, term: &str) {
        let previous_index = self.current_index();
        self.store.search(term);
        debug!(term = self.store.search_term(), visible = self.store.visible_len(), "Search applied");

        self.emit_playlist_changed();
        if self.current_index() != previous_index {
            self.emit_track_changed();
        }
    }

    /// Remove every track, stop the transport and clear the selection
    pub fn clear(&mut self) {
        if self.store.is_empty() {
            return;
        }

        let removed = self.store.clear();
        info!(count = removed.len(), "Clearing playlist");
        for track in &removed {
            self.release(track);
        }

        self.stop_and_deselect();
        self.persist_playlist();
        self.emit_playlist_changed();
        self.notice(NoticeLevel::Success, "Playlist cleared");
    }

    /// Select the track at a visible position and load it
    ///
    /// Any pending load is superseded. Returns
    /// [`PlaybackError::IndexOutOfRange`] without side effects when the index
    /// is outside the filtered view.
    pub fn load_track(&mut self, index: usize, autoplay: bool) -> Result<()> {
        let Some(track) = self.store.get(index) else {
            let len = self.store.visible_len();
            debug!(index, len, "Load outside visible range ignored");
            return Err(PlaybackError::IndexOutOfRange { index, len });
        };
        let id = track.id.clone();
        let source = track.source.clone();

        let was_playing = self.transport.is_playing();
        let session = self.sequencer.begin(id.clone(), autoplay, self.selection.clone());
        self.selection = Some(id);
        self.transport.load(session, &source);

        self.persist_current_index();
        self.emit_track_changed();
        if was_playing {
            self.emit(PlayerEvent::StateChanged { playing: false });
        }
        self.emit_progress();
        Ok(())
    }

    /// Abort the pending load
    ///
    /// Clears the transport source, suppresses the resulting error and
    /// restores the selection that was in effect before the load. Returns
    /// `false` when nothing was loading.
    pub fn cancel_loading(&mut self) -> bool {
        let Some(pending) = self.sequencer.begin_cancel() else {
            debug!("No load in progress to cancel");
            return false;
        };

        self.transport.unload(self.sequencer.session());
        self.pump();

        // Fall back to the cancelled track when there is nothing to restore
        self.selection = pending
            .restore
            .into_iter()
            .chain(std::iter::once(pending.track.clone()))
            .find(|id| self.store.find(id).is_some());
        self.sequencer.finish_cancel();
        info!(track = %pending.track, "Loading cancelled");

        self.persist_current_index();
        self.emit_track_changed();
        self.emit_progress();
        self.notice(NoticeLevel::Info, "Loading cancelled");
        true
    }

    // ===== Playback Control =====

    /// Play if paused, pause if playing
    ///
    /// With no source loaded (after a cancel) the current track is loaded
    /// with autoplay.
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        self.ensure_not_empty()?;

        if self.transport.is_playing() {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Start or resume playback
    pub fn play(&mut self) -> Result<()> {
        self.ensure_not_empty()?;

        if !self.transport.has_source() {
            let index = self.current_index().unwrap_or(0);
            return self.load_track(index, true);
        }
        self.start_transport()
    }

    /// Pause playback
    ///
    /// Returns `false` and emits nothing when already paused.
    pub fn pause(&mut self) -> bool {
        let paused = self.transport.pause();
        if paused {
            self.emit(PlayerEvent::StateChanged { playing: false });
        }
        paused
    }

    /// Skip to next track
    ///
    /// With shuffle on a random visible track other than the current one is
    /// picked; otherwise the next visible track, wrapping to the first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        let len = self.visible_len_or_warn()?;
        let current = self.current_index();

        let index = if self.shuffle {
            pick_next_index(&mut self.rng, len, current)
        } else {
            current.map_or(0, |i| (i + 1) % len)
        };
        debug!(?current, index, shuffle = self.shuffle, "Next track");
        self.load_track(index, true)
    }

    /// Go to the previous visible track, wrapping to the last
    pub fn previous(&mut self) -> Result<()> {
        let len = self.visible_len_or_warn()?;
        let index = match self.current_index() {
            Some(i) if i > 0 => i - 1,
            _ => len - 1,
        };
        debug!(index, "Previous track");
        self.load_track(index, true)
    }

    /// Seek to an absolute position, clamped to the track
    ///
    /// Returns the applied position, or `None` while the duration is unknown.
    pub fn seek(&mut self, seconds: f64) -> Option<f64> {
        let applied = self.transport.seek(seconds)?;
        self.emit_progress();
        Some(applied)
    }

    /// Seek relative to the current position
    pub fn seek_by(&mut self, delta: f64) -> Option<f64> {
        let position = self.transport.state().position_seconds;
        self.seek(position + delta)
    }

    /// Skip forward by the configured step
    pub fn skip_forward(&mut self) -> Option<f64> {
        self.seek_by(self.config.seek_step_secs)
    }

    /// Skip backward by the configured step
    pub fn skip_backward(&mut self) -> Option<f64> {
        self.seek_by(-self.config.seek_step_secs)
    }

    /// Start dragging the progress bar at a fraction of the duration
    ///
    /// Ignored while the duration is unknown.
    pub fn begin_scrub(&mut self, fraction: f64) {
        if self.transport.state().duration_seconds.is_none() {
            return;
        }
        self.transport.begin_scrub();
        self.scrub_to(fraction);
    }

    /// Move the playhead while dragging
    pub fn scrub_to(&mut self, fraction: f64) -> Option<f64> {
        let duration = self.transport.state().duration_seconds?;
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.seek(fraction * duration)
    }

    /// Release the progress bar; position updates resume
    pub fn end_scrub(&mut self) {
        self.transport.end_scrub();
    }

    // ===== Volume =====

    /// Set volume (clamped to 0.0-1.0)
    pub fn set_volume(&mut self, level: f32) -> f32 {
        let applied = self.transport.set_volume(level);
        self.persist_volume();
        self.emit_volume_changed();
        applied
    }

    /// Adjust volume by a signed step
    pub fn nudge_volume(&mut self, delta: f32) -> f32 {
        let level = self.transport.state().volume.level();
        self.set_volume(level + delta)
    }

    /// Raise volume by the configured step
    pub fn volume_up(&mut self) -> f32 {
        self.nudge_volume(self.config.volume_step)
    }

    /// Lower volume by the configured step
    pub fn volume_down(&mut self) -> f32 {
        self.nudge_volume(-self.config.volume_step)
    }

    /// Mute or unmute (level preserved)
    pub fn set_muted(&mut self, muted: bool) {
        self.transport.set_muted(muted);
        self.emit_volume_changed();
    }

    /// Toggle mute
    pub fn toggle_mute(&mut self) {
        let muted = self.transport.state().volume.is_muted();
        self.set_muted(!muted);
    }

    // ===== Shuffle & Repeat =====

    /// Enable or disable shuffle
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.shuffle = enabled;
        self.persist_shuffle();
        self.emit(PlayerEvent::ShuffleChanged { enabled });
        let message = if enabled {
            "Shuffle enabled"
        } else {
            "Shuffle disabled"
        };
        self.notice(NoticeLevel::Success, message);
    }

    /// Toggle shuffle
    pub fn toggle_shuffle(&mut self) {
        self.set_shuffle(!self.shuffle);
    }

    /// Set the repeat mode
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
        self.persist_repeat();
        self.emit(PlayerEvent::RepeatChanged {
            mode: mode.as_str().to_string(),
        });
        self.notice(NoticeLevel::Success, format!("Repeat {}", mode.as_str()));
    }

    /// Cycle repeat: off, all, one, off
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        let mode = self.repeat.cycle();
        self.set_repeat(mode);
        mode
    }

    // ===== Theme =====

    /// Switch between dark and light
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if self.config.persist {
            if let Some(persistence) = self.persistence.as_mut() {
                log_persist_failure("theme", persistence.save_theme(self.theme));
            }
        }
        self.emit(PlayerEvent::ThemeChanged {
            theme: self.theme.as_str().to_string(),
        });
        self.theme
    }

    // ===== Backend signals =====

    /// Process a lifecycle signal from the media backend
    ///
    /// Signals for superseded sessions have no effect.
    pub fn handle_signal(&mut self, session: SessionId, signal: MediaSignal) {
        let Some(event) = self.transport.accept(session, signal) else {
            return;
        };

        match event {
            TransportEvent::LoadStarted => debug!(%session, "Load started"),
            TransportEvent::MetadataReady(duration) => {
                self.emit(PlayerEvent::DurationChanged { duration });
                self.emit_progress();
            }
            TransportEvent::PositionChanged(_) => self.emit_progress(),
            TransportEvent::ReadyToPlay => match self.sequencer.on_ready(session) {
                ReadyOutcome::Autoplay(pending) => {
                    debug!(%session, track = %pending.track, "Ready, starting playback");
                    if let Err(e) = self.start_transport() {
                        debug!(%session, error = %e, "Autoplay did not start");
                    }
                }
                ReadyOutcome::Settle(pending) => {
                    debug!(%session, track = %pending.track, "Ready");
                }
                ReadyOutcome::Stale => {}
            },
            TransportEvent::Ended => self.on_ended(),
            TransportEvent::Error(reason) if !self.transport.has_source() => {
                // Late report of a source torn down by cancel or clear
                debug!(%session, %reason, "Suppressed media error after teardown");
            }
            TransportEvent::Error(reason) => match self.sequencer.on_error(session) {
                ErrorDisposition::Suppress => {
                    debug!(%session, %reason, "Suppressed media error");
                }
                ErrorDisposition::Surface => {
                    let error = PlaybackError::MediaLoad(reason);
                    warn!(%session, error = %error, "Media error");
                    self.emit(PlayerEvent::StateChanged { playing: false });
                    self.notice(NoticeLevel::Error, LOAD_FAILED_NOTICE);
                }
            },
            TransportEvent::PlayRejected(reason) => {
                warn!(%session, %reason, "Playback rejected");
                self.emit(PlayerEvent::StateChanged { playing: false });
                self.notice(NoticeLevel::Error, PLAY_FAILED_NOTICE);
            }
        }
    }

    /// Pull and process every signal the backend has queued
    pub fn pump(&mut self) {
        for (session, signal) in self.transport.take_signals() {
            self.handle_signal(session, signal);
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== State Queries =====

    /// Visible position of the selected track
    ///
    /// `None` when nothing is selected or the selection is hidden by search.
    pub fn current_index(&self) -> Option<usize> {
        self.selection
            .as_ref()
            .and_then(|id| self.store.position_of(id))
    }

    /// Identity of the selected track, visible or not
    pub fn selected_id(&self) -> Option<&TrackId> {
        self.selection.as_ref()
    }

    /// Selected track, visible or not
    pub fn current_track(&self) -> Option<&Track> {
        self.selection.as_ref().and_then(|id| self.store.find(id))
    }

    /// All tracks in playlist order
    pub fn tracks(&self) -> &[Track] {
        self.store.tracks()
    }

    /// Visible tracks in playlist order
    pub fn filtered(&self) -> impl Iterator<Item = &Track> + '_ {
        self.store.filtered()
    }

    /// Track store
    pub fn store(&self) -> &TrackStore {
        &self.store
    }

    /// Transport state
    pub fn state(&self) -> &TransportState {
        self.transport.state()
    }

    /// Whether audio is playing
    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    /// Current volume
    pub fn volume(&self) -> Volume {
        self.transport.state().volume
    }

    /// Whether shuffle is on
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Current repeat mode
    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Current theme
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Load sequencer state
    pub fn load_state(&self) -> &LoadState {
        self.sequencer.state()
    }

    /// Current load session
    pub fn session(&self) -> SessionId {
        self.sequencer.session()
    }

    /// Player configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Borrow the media backend
    pub fn backend(&self) -> &B {
        self.transport.backend()
    }

    /// Mutably borrow the media backend
    pub fn backend_mut(&mut self) -> &mut B {
        self.transport.backend_mut()
    }

    // ===== Internal =====

    fn on_ended(&mut self) {
        debug!(repeat = %self.repeat, "Track ended");
        match self.repeat {
            RepeatMode::One => {
                self.transport.rewind();
                self.emit_progress();
                if let Err(e) = self.start_transport() {
                    debug!(error = %e, "Repeat of current track did not start");
                }
            }
            RepeatMode::All => self.advance_after_end(),
            RepeatMode::Off => {
                let len = self.store.visible_len();
                let is_last = self.current_index().is_some_and(|i| i + 1 >= len);
                if is_last || len == 0 {
                    self.transport.rewind();
                    self.emit(PlayerEvent::StateChanged { playing: false });
                    self.emit_progress();
                } else {
                    self.advance_after_end();
                }
            }
        }
    }

    fn advance_after_end(&mut self) {
        if let Err(e) = self.next() {
            debug!(error = %e, "No track to advance to after end");
        }
    }

    fn start_transport(&mut self) -> Result<()> {
        if self.transport.is_playing() {
            return Ok(());
        }
        match self.transport.play() {
            Ok(()) => {
                self.emit(PlayerEvent::StateChanged { playing: true });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to start playback");
                self.notice(NoticeLevel::Error, PLAY_FAILED_NOTICE);
                Err(e)
            }
        }
    }

    // Select the first playlist track without autoplay; a track hidden by the
    // active search is selected but not loaded
    fn select_first(&mut self) {
        let Some(first) = self.store.tracks().first().map(|t| t.id.clone()) else {
            return;
        };
        match self.store.position_of(&first) {
            Some(index) => {
                if let Err(e) = self.load_track(index, false) {
                    debug!(error = %e, "First track not loadable");
                }
            }
            None => {
                debug!(track = %first, "First track hidden by search, selected without loading");
                self.selection = Some(first);
                self.persist_current_index();
                self.emit_track_changed();
            }
        }
    }

    // Tear down the source with errors suppressed and forget the selection
    fn stop_and_deselect(&mut self) {
        let was_playing = self.transport.is_playing();
        let session = self.sequencer.reset();
        self.transport.unload(session);
        self.pump();
        self.sequencer.finish_cancel();

        self.selection = None;
        self.persist_current_index();
        self.emit_track_changed();
        if was_playing {
            self.emit(PlayerEvent::StateChanged { playing: false });
        }
        self.emit_progress();
    }

    fn ensure_not_empty(&mut self) -> Result<()> {
        if self.store.is_empty() {
            self.notice(NoticeLevel::Warning, EMPTY_PLAYLIST_NOTICE);
            return Err(PlaybackError::EmptyPlaylist);
        }
        Ok(())
    }

    fn visible_len_or_warn(&mut self) -> Result<usize> {
        self.ensure_not_empty()?;
        match self.store.visible_len() {
            0 => {
                debug!("Search hides every track");
                Err(PlaybackError::EmptyPlaylist)
            }
            len => Ok(len),
        }
    }

    fn release(&self, track: &Track) {
        let Some(releaser) = self.releaser.as_ref() else {
            return;
        };
        std::iter::once(&track.source)
            .chain(track.cover.as_ref())
            .filter(|handle| handle.is_transient())
            .for_each(|handle| releaser.release(handle));
    }

    fn persist_playlist(&mut self) {
        if !self.config.persist {
            return;
        }
        if let Some(persistence) = self.persistence.as_mut() {
            log_persist_failure("playlist", persistence.save_playlist(self.store.tracks()));
        }
    }

    fn persist_current_index(&mut self) {
        if !self.config.persist {
            return;
        }
        // Counted among persistable tracks, matching the saved playlist
        let index = self.selection.as_ref().and_then(|id| {
            self.store
                .tracks()
                .iter()
                .filter(|t| t.is_persistable())
                .position(|t| &t.id == id)
        });
        if let Some(persistence) = self.persistence.as_mut() {
            log_persist_failure("current index", persistence.save_current_index(index));
        }
    }

    fn persist_volume(&mut self) {
        if !self.config.persist {
            return;
        }
        let level = self.transport.state().volume.level();
        if let Some(persistence) = self.persistence.as_mut() {
            log_persist_failure("volume", persistence.save_volume(level));
        }
    }

    fn persist_shuffle(&mut self) {
        if !self.config.persist {
            return;
        }
        if let Some(persistence) = self.persistence.as_mut() {
            log_persist_failure("shuffle", persistence.save_shuffle(self.shuffle));
        }
    }

    fn persist_repeat(&mut self) {
        if !self.config.persist {
            return;
        }
        if let Some(persistence) = self.persistence.as_mut() {
            log_persist_failure("repeat", persistence.save_repeat(self.repeat));
        }
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.emit(PlayerEvent::notice(level, message));
    }

    fn emit_track_changed(&mut self) {
        let index = self.current_index();
        let track_id = self.selection.as_ref().map(|id| id.as_str().to_string());
        self.emit(PlayerEvent::TrackChanged { index, track_id });
    }

    fn emit_playlist_changed(&mut self) {
        self.emit(PlayerEvent::PlaylistChanged {
            total: self.store.len(),
            visible: self.store.visible_len(),
        });
    }

    fn emit_volume_changed(&mut self) {
        let volume = self.transport.state().volume;
        self.emit(PlayerEvent::VolumeChanged {
            level: volume.level(),
            muted: volume.is_muted(),
        });
    }

    fn emit_progress(&mut self) {
        let state = self.transport.state();
        let event = PlayerEvent::Progress {
            position: state.position_seconds,
            duration: state.duration_seconds,
        };
        self.emit(event);
    }
}

fn log_persist_failure(what: &str, result: encore_core::Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, what, "Failed to persist player state");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedBackend;
    use encore_core::ResourceHandle;

    fn track(title: &str) -> Track {
        Track::new(
            title,
            "Artist",
            "Album",
            ResourceHandle::remote(format!("https://music.test/{}.mp3", title)),
        )
    }

    fn player_with(titles: &[&str]) -> Player<SimulatedBackend> {
        let mut player = Player::new(SimulatedBackend::auto_ready(), PlayerConfig::default()).with_seed(7);
        player.add(titles.iter().map(|t| track(t)).collect());
        player.pump();
        player.drain_events();
        player
    }

    #[test]
    fn first_add_selects_without_playing() {
        let player = player_with(&["a", "b"]);
        assert_eq!(player.current_index(), Some(0));
        assert!(!player.is_playing());
        assert_eq!(player.load_state(), &LoadState::Idle);
    }

    #[test]
    fn toggle_on_empty_playlist_warns() {
        let mut player = Player::new(SimulatedBackend::new(), PlayerConfig::default());
        assert_eq!(player.toggle_play_pause(), Err(PlaybackError::EmptyPlaylist));
        assert_eq!(
            player.drain_events(),
            vec![PlayerEvent::notice(NoticeLevel::Warning, EMPTY_PLAYLIST_NOTICE)]
        );
    }

    #[test]
    fn pause_when_paused_emits_nothing() {
        let mut player = player_with(&["a"]);
        assert!(!player.pause());
        assert!(!player.has_pending_events());
    }

    #[test]
    fn load_track_out_of_range_is_silent() {
        let mut player = player_with(&["a"]);
        assert_eq!(
            player.load_track(3, true),
            Err(PlaybackError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert!(!player.has_pending_events());
        assert_eq!(player.current_index(), Some(0));
    }

    #[test]
    fn play_rejection_is_surfaced() {
        let mut player = player_with(&["a"]);
        player.backend_mut().reject_next_play("NotAllowedError");

        assert!(player.toggle_play_pause().is_err());
        assert!(!player.is_playing());
        assert!(player
            .drain_events()
            .contains(&PlayerEvent::notice(NoticeLevel::Error, PLAY_FAILED_NOTICE)));
    }

    #[test]
    fn media_error_surfaces_once() {
        let mut player = player_with(&["a", "b"]);
        let broken = player.tracks()[1].source.clone();
        player.backend_mut().fail_resource(&broken, "decode failed");

        player.load_track(1, true).unwrap();
        player.pump();

        let notices: Vec<_> = player
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, PlayerEvent::Notice { .. }))
            .collect();
        assert_eq!(
            notices,
            vec![PlayerEvent::notice(NoticeLevel::Error, LOAD_FAILED_NOTICE)]
        );
        assert_eq!(player.load_state(), &LoadState::Idle);
        assert!(!player.is_playing());
    }

    #[test]
    fn cycle_repeat_wraps() {
        let mut player = player_with(&[]);
        assert_eq!(player.cycle_repeat(), RepeatMode::All);
        assert_eq!(player.cycle_repeat(), RepeatMode::One);
        assert_eq!(player.cycle_repeat(), RepeatMode::Off);
    }

    #[test]
    fn volume_nudges_clamp() {
        let mut player = player_with(&[]);
        player.set_volume(0.98);
        assert_eq!(player.volume_up(), 1.0);
        player.set_volume(0.02);
        assert_eq!(player.volume_down(), 0.0);
        assert_eq!(player.backend().volume(), (0.0, false));
    }

    #[test]
    fn scrub_is_ignored_without_duration() {
        let mut player = Player::new(SimulatedBackend::new(), PlayerConfig::default());
        player.add(vec![track("a")]);
        player.begin_scrub(0.5);
        assert!(!player.transport.is_scrubbing());
    }

    #[test]
    fn toggle_theme_flips() {
        let mut player = player_with(&[]);
        assert_eq!(player.toggle_theme(), Theme::Light);
        assert_eq!(player.toggle_theme(), Theme::Dark);
    }
}
