//! Browser-side collaborators
//!
//! Imported JS interfaces and their adapters to the player's seams.

use crate::events::MediaSignal;
use crate::transport::MediaBackend;
use crate::types::SessionId;
use encore_core::{ResourceHandle, ResourceReleaser};
use encore_storage::{KeyValueStore, StorageError};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Page-side wrapper around an `<audio>` element
    ///
    /// The page reports the element's events back with `notify(session, …)`
    /// using the session it received in `setSource`.
    pub type MediaElementHost;

    #[wasm_bindgen(method, js_name = setSource)]
    fn set_source(this: &MediaElementHost, session: f64, uri: Option<String>);

    #[wasm_bindgen(method, catch)]
    fn start(this: &MediaElementHost) -> Result<(), JsValue>;

    #[wasm_bindgen(method)]
    fn halt(this: &MediaElementHost);

    #[wasm_bindgen(method, js_name = setPosition)]
    fn set_position(this: &MediaElementHost, seconds: f64);

    #[wasm_bindgen(method, js_name = applyVolume)]
    fn apply_volume(this: &MediaElementHost, level: f32, muted: bool);

    #[wasm_bindgen(method, js_name = releaseResource)]
    fn release_resource(this: &MediaElementHost, uri: &str);

    /// Anything shaped like `window.localStorage`
    pub type StorageHost;

    #[wasm_bindgen(method, catch, js_name = getItem)]
    fn get_item(this: &StorageHost, key: &str) -> Result<Option<String>, JsValue>;

    #[wasm_bindgen(method, catch, js_name = setItem)]
    fn set_item(this: &StorageHost, key: &str, value: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = removeItem)]
    fn remove_item(this: &StorageHost, key: &str) -> Result<(), JsValue>;
}

/// Convert a session to a JS number
#[allow(clippy::cast_precision_loss)]
pub(crate) fn session_to_js(session: SessionId) -> f64 {
    session.raw() as f64
}

/// Convert a JS number back to a session
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn session_from_js(raw: f64) -> SessionId {
    SessionId::from_raw(raw.max(0.0) as u64)
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// [`MediaBackend`] driving a page-side audio element
pub struct JsMediaBackend {
    host: MediaElementHost,
}

impl JsMediaBackend {
    /// Wrap a host
    pub fn new(host: MediaElementHost) -> Self {
        Self { host }
    }
}

impl MediaBackend for JsMediaBackend {
    fn set_source(&mut self, session: SessionId, resource: Option<&ResourceHandle>) {
        self.host.set_source(
            session_to_js(session),
            resource.map(|r| r.uri().to_string()),
        );
    }

    fn start(&mut self) -> std::result::Result<(), String> {
        self.host.start().map_err(|e| describe(&e))
    }

    fn halt(&mut self) {
        self.host.halt();
    }

    fn set_position(&mut self, seconds: f64) {
        self.host.set_position(seconds);
    }

    fn apply_volume(&mut self, level: f32, muted: bool) {
        self.host.apply_volume(level, muted);
    }

    // Signals arrive through `WasmPlayer::notify`
    fn take_signals(&mut self) -> Vec<(SessionId, MediaSignal)> {
        Vec::new()
    }
}

/// Revokes object URLs through the page
pub struct JsReleaser {
    host: MediaElementHost,
}

impl JsReleaser {
    /// Wrap a host
    pub fn new(host: MediaElementHost) -> Self {
        Self { host }
    }
}

impl ResourceReleaser for JsReleaser {
    fn release(&self, handle: &ResourceHandle) {
        if handle.is_transient() {
            self.host.release_resource(handle.uri());
        }
    }
}

/// [`KeyValueStore`] over `localStorage`
pub struct JsStore {
    host: StorageHost,
}

impl JsStore {
    /// Wrap a storage object
    pub fn new(host: StorageHost) -> Self {
        Self { host }
    }
}

impl KeyValueStore for JsStore {
    fn get(&self, key: &str) -> encore_storage::Result<Option<String>> {
        self.host
            .get_item(key)
            .map_err(|e| StorageError::unavailable(describe(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> encore_storage::Result<()> {
        self.host
            .set_item(key, value)
            .map_err(|e| StorageError::unavailable(describe(&e)))
    }

    fn remove(&mut self, key: &str) -> encore_storage::Result<()> {
        self.host
            .remove_item(key)
            .map_err(|e| StorageError::unavailable(describe(&e)))
    }
}
