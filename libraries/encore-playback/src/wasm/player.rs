//! WASM-compatible Player wrapper

use super::host::{session_from_js, JsMediaBackend, JsReleaser, JsStore, MediaElementHost, StorageHost};
use super::types::WasmTrack;
use crate::{MediaSignal, PlaybackError, Player, PlayerConfig};
use encore_core::{format_time, RepeatMode, Track};
use encore_storage::KeyValuePersistence;
use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// WASM-compatible player
///
/// Wraps the core [`Player`] with a JavaScript-friendly API. Every queued
/// player event is delivered to the `onEvent` callback after each call.
#[wasm_bindgen]
pub struct WasmPlayer {
    inner: Player<JsMediaBackend>,

    // Event callback
    on_event: Option<Function>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player
    ///
    /// `storage` may be `window.localStorage`, or `undefined` to keep state
    /// for the page's lifetime only.
    #[wasm_bindgen(constructor)]
    pub fn new(media: MediaElementHost, storage: JsValue) -> Self {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let releaser = JsReleaser::new(media.clone());
        let mut inner = Player::new(JsMediaBackend::new(media), PlayerConfig::default())
            .with_releaser(Box::new(releaser));
        if !storage.is_undefined() && !storage.is_null() {
            let store = JsStore::new(storage.unchecked_into::<StorageHost>());
            inner = inner.with_persistence(Box::new(KeyValuePersistence::new(store)));
        }

        Self {
            inner,
            on_event: None,
        }
    }

    /// Register the event callback
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&mut self, callback: Function) {
        self.on_event = Some(callback);
    }

    /// Apply persisted state (call once after registering `onEvent`)
    pub fn restore(&mut self) {
        self.inner.restore();
        self.flush_events();
    }

    /// Forward an audio element event
    ///
    /// `signal` is `{ kind: "readyToPlay" }`, `{ kind: "timeUpdate", position }`
    /// and so on, tagged with the session the element was loaded under.
    pub fn notify(&mut self, session: f64, signal: JsValue) -> Result<(), JsValue> {
        let signal: MediaSignal = serde_wasm_bindgen::from_value(signal)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse signal: {}", e)))?;
        self.inner.handle_signal(session_from_js(session), signal);
        self.flush_events();
        Ok(())
    }

    // ===== Playlist =====

    /// Append tracks
    #[wasm_bindgen(js_name = addTracks)]
    pub fn add_tracks(&mut self, tracks: JsValue) -> Result<(), JsValue> {
        let wasm_tracks: Vec<WasmTrack> = serde_wasm_bindgen::from_value(tracks)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {}", e)))?;

        let tracks = wasm_tracks
            .into_iter()
            .map(Track::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        self.inner.add(tracks);
        self.flush_events();
        Ok(())
    }

    /// Remove the track at a visible index; returns it, or `null`
    pub fn remove(&mut self, index: usize) -> JsValue {
        let removed = self.inner.remove(index);
        self.flush_events();
        removed
            .map(|track| WasmTrack::from(&track))
            .and_then(|track| serde_wasm_bindgen::to_value(&track).ok())
            .unwrap_or(JsValue::NULL)
    }

    /// Filter the visible list
    pub fn search(&mut self, term: &str) {
        self.inner.search(term);
        self.flush_events();
    }

    /// Remove every track
    pub fn clear(&mut self) {
        self.inner.clear();
        self.flush_events();
    }

    /// Select and load a visible track
    #[wasm_bindgen(js_name = loadTrack)]
    pub fn load_track(&mut self, index: usize, autoplay: bool) -> Result<(), JsValue> {
        let result = self.inner.load_track(index, autoplay);
        self.finish(result)
    }

    /// Abort the pending load
    #[wasm_bindgen(js_name = cancelLoading)]
    pub fn cancel_loading(&mut self) -> bool {
        let cancelled = self.inner.cancel_loading();
        self.flush_events();
        cancelled
    }

    // ===== Playback Control =====

    /// Play/pause toggle
    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&mut self) -> Result<(), JsValue> {
        let result = self.inner.toggle_play_pause();
        self.finish(result)
    }

    /// Start or resume playback
    pub fn play(&mut self) -> Result<(), JsValue> {
        let result = self.inner.play();
        self.finish(result)
    }

    /// Pause playback
    pub fn pause(&mut self) -> bool {
        let paused = self.inner.pause();
        self.flush_events();
        paused
    }

    /// Skip to next track
    pub fn next(&mut self) -> Result<(), JsValue> {
        let result = self.inner.next();
        self.finish(result)
    }

    /// Go to previous track
    pub fn previous(&mut self) -> Result<(), JsValue> {
        let result = self.inner.previous();
        self.finish(result)
    }

    // ===== Seeking =====

    /// Seek to position in seconds
    pub fn seek(&mut self, seconds: f64) -> Option<f64> {
        let applied = self.inner.seek(seconds);
        self.flush_events();
        applied
    }

    /// Seek relative to the current position
    #[wasm_bindgen(js_name = seekBy)]
    pub fn seek_by(&mut self, delta: f64) -> Option<f64> {
        let applied = self.inner.seek_by(delta);
        self.flush_events();
        applied
    }

    /// Press on the progress bar (fraction 0.0 - 1.0)
    #[wasm_bindgen(js_name = beginScrub)]
    pub fn begin_scrub(&mut self, fraction: f64) {
        self.inner.begin_scrub(fraction);
        self.flush_events();
    }

    /// Drag on the progress bar
    #[wasm_bindgen(js_name = scrubTo)]
    pub fn scrub_to(&mut self, fraction: f64) {
        self.inner.scrub_to(fraction);
        self.flush_events();
    }

    /// Release the progress bar
    #[wasm_bindgen(js_name = endScrub)]
    pub fn end_scrub(&mut self) {
        self.inner.end_scrub();
    }

    // ===== Volume Control =====

    /// Set volume (0.0 - 1.0)
    #[wasm_bindgen(js_name = setVolume)]
    pub fn set_volume(&mut self, level: f32) -> f32 {
        let applied = self.inner.set_volume(level);
        self.flush_events();
        applied
    }

    /// Raise volume by one step
    #[wasm_bindgen(js_name = volumeUp)]
    pub fn volume_up(&mut self) -> f32 {
        let applied = self.inner.volume_up();
        self.flush_events();
        applied
    }

    /// Lower volume by one step
    #[wasm_bindgen(js_name = volumeDown)]
    pub fn volume_down(&mut self) -> f32 {
        let applied = self.inner.volume_down();
        self.flush_events();
        applied
    }

    /// Toggle mute
    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) {
        self.inner.toggle_mute();
        self.flush_events();
    }

    // ===== Shuffle, Repeat & Theme =====

    /// Toggle shuffle; returns the new state
    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&mut self) -> bool {
        self.inner.toggle_shuffle();
        self.flush_events();
        self.inner.shuffle()
    }

    /// Cycle repeat; returns "off" | "all" | "one"
    #[wasm_bindgen(js_name = cycleRepeat)]
    pub fn cycle_repeat(&mut self) -> String {
        let mode = self.inner.cycle_repeat();
        self.flush_events();
        mode.as_str().to_string()
    }

    /// Set repeat mode ("off" | "all" | "one")
    #[wasm_bindgen(js_name = setRepeat)]
    pub fn set_repeat(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = RepeatMode::parse(mode)
            .ok_or_else(|| JsValue::from_str("Invalid repeat mode. Use 'off', 'all', or 'one'"))?;
        self.inner.set_repeat(mode);
        self.flush_events();
        Ok(())
    }

    /// Toggle theme; returns "dark" | "light"
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&mut self) -> String {
        let theme = self.inner.toggle_theme();
        self.flush_events();
        theme.as_str().to_string()
    }

    // ===== State Queries =====

    /// Visible index of the selection, or -1
    #[wasm_bindgen(js_name = currentIndex)]
    pub fn current_index(&self) -> i32 {
        self.inner
            .current_index()
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(-1)
    }

    /// Whether audio is playing
    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.is_playing()
    }

    /// Whether audio is muted
    #[wasm_bindgen(js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.inner.volume().is_muted()
    }

    /// Volume level (0.0 - 1.0)
    #[wasm_bindgen(js_name = getVolume)]
    pub fn get_volume(&self) -> f32 {
        self.inner.volume().level()
    }

    /// Playhead in seconds
    #[wasm_bindgen(js_name = getPosition)]
    pub fn get_position(&self) -> f64 {
        self.inner.state().position_seconds
    }

    /// Duration in seconds, once known
    #[wasm_bindgen(js_name = getDuration)]
    pub fn get_duration(&self) -> Option<f64> {
        self.inner.state().duration_seconds
    }

    /// Visible tracks
    #[wasm_bindgen(js_name = getVisibleTracks)]
    pub fn get_visible_tracks(&self) -> JsValue {
        let tracks: Vec<WasmTrack> = self.inner.filtered().map(WasmTrack::from).collect();
        serde_wasm_bindgen::to_value(&tracks).unwrap_or(JsValue::NULL)
    }

    /// Whole playlist
    #[wasm_bindgen(js_name = getTracks)]
    pub fn get_tracks(&self) -> JsValue {
        let tracks: Vec<WasmTrack> = self.inner.tracks().iter().map(WasmTrack::from).collect();
        serde_wasm_bindgen::to_value(&tracks).unwrap_or(JsValue::NULL)
    }

    // ===== Internal =====

    fn finish(&mut self, result: crate::Result<()>) -> Result<(), JsValue> {
        self.flush_events();
        result.map_err(|e| Self::to_js_error(&e))
    }

    fn to_js_error(error: &PlaybackError) -> JsValue {
        JsValue::from_str(&error.to_string())
    }

    fn flush_events(&mut self) {
        let events = self.inner.drain_events();
        let Some(ref cb) = self.on_event else {
            return;
        };
        for event in events {
            if let Ok(js_event) = serde_wasm_bindgen::to_value(&event) {
                cb.call1(&JsValue::NULL, &js_event).ok();
            }
        }
    }
}

/// Format seconds as `m:ss`
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time_js(seconds: f64) -> String {
    format_time(seconds)
}
