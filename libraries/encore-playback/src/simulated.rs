//! Deterministic media backend
//!
//! Plays nothing; it records what the transport asked for and queues the
//! lifecycle signals a browser audio element would raise. Used by headless
//! hosts and tests to drive the player one event at a time.

use crate::events::MediaSignal;
use crate::transport::MediaBackend;
use crate::types::SessionId;
use encore_core::ResourceHandle;
use std::collections::{HashMap, VecDeque};

/// Duration reported for resources without an explicit one
const DEFAULT_DURATION_SECS: f64 = 180.0;

/// Backend that simulates a media element
#[derive(Debug, Default)]
pub struct SimulatedBackend {
    session: SessionId,
    source: Option<ResourceHandle>,
    playing: bool,
    position: f64,
    volume: (f32, bool),
    durations: HashMap<String, f64>,
    failing: HashMap<String, String>,
    reject_next: Option<String>,
    auto_ready: bool,
    queue: VecDeque<(SessionId, MediaSignal)>,
    started: Vec<ResourceHandle>,
    halts: usize,
}

impl SimulatedBackend {
    /// Create a backend that waits for explicit readiness
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that becomes ready as soon as a source is set
    pub fn auto_ready() -> Self {
        Self {
            auto_ready: true,
            ..Self::default()
        }
    }

    /// Fix the duration reported for a resource
    pub fn set_duration(&mut self, resource: &ResourceHandle, seconds: f64) {
        self.durations.insert(resource.uri().to_string(), seconds);
    }

    /// Make loads of a resource fail with `reason`
    pub fn fail_resource(&mut self, resource: &ResourceHandle, reason: impl Into<String>) {
        self.failing.insert(resource.uri().to_string(), reason.into());
    }

    /// Refuse the next start request
    pub fn reject_next_play(&mut self, reason: impl Into<String>) {
        self.reject_next = Some(reason.into());
    }

    /// Queue an arbitrary signal
    pub fn emit(&mut self, session: SessionId, signal: MediaSignal) {
        self.queue.push_back((session, signal));
    }

    /// Queue metadata and readiness for the current source
    ///
    /// Returns the session the signals were tagged with, or `None` with no
    /// source set.
    pub fn finish_loading(&mut self) -> Option<SessionId> {
        let source = self.source.clone()?;
        self.queue_ready(self.session, &source);
        Some(self.session)
    }

    /// Advance the playhead while playing, raising time updates and `Ended`
    pub fn advance(&mut self, seconds: f64) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        if !self.playing || seconds <= 0.0 {
            return;
        }

        let duration = self.duration_of(source);
        self.position = (self.position + seconds).min(duration);
        self.queue.push_back((
            self.session,
            MediaSignal::TimeUpdate {
                position: self.position,
            },
        ));

        if self.position >= duration {
            self.playing = false;
            self.queue.push_back((self.session, MediaSignal::Ended));
        }
    }

    /// Resources that were actually started, in order
    pub fn started(&self) -> &[ResourceHandle] {
        &self.started
    }

    /// Current source
    pub fn source(&self) -> Option<&ResourceHandle> {
        self.source.as_ref()
    }

    /// Whether the simulated medium is playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Simulated playhead
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Last applied (level, muted)
    pub fn volume(&self) -> (f32, bool) {
        self.volume
    }

    /// Number of pause requests received
    pub fn halt_count(&self) -> usize {
        self.halts
    }

    /// Session of the current source
    pub fn session(&self) -> SessionId {
        self.session
    }

    fn duration_of(&self, resource: &ResourceHandle) -> f64 {
        self.durations
            .get(resource.uri())
            .copied()
            .unwrap_or(DEFAULT_DURATION_SECS)
    }

    fn queue_ready(&mut self, session: SessionId, source: &ResourceHandle) {
        if let Some(reason) = self.failing.get(source.uri()).cloned() {
            self.queue.push_back((session, MediaSignal::Error { reason }));
            return;
        }

        let duration = self.duration_of(source);
        self.queue
            .push_back((session, MediaSignal::MetadataReady { duration }));
        self.queue.push_back((session, MediaSignal::ReadyToPlay));
    }
}

impl MediaBackend for SimulatedBackend {
    fn set_source(&mut self, session: SessionId, resource: Option<&ResourceHandle>) {
        let had_source = self.source.is_some();
        self.session = session;
        self.source = resource.cloned();
        self.playing = false;
        self.position = 0.0;

        match resource {
            Some(resource) => {
                self.queue.push_back((session, MediaSignal::LoadStarted));
                if self.auto_ready {
                    self.queue_ready(session, resource);
                }
            }
            // Clearing the source of a media element raises an error event
            None if had_source => self.queue.push_back((
                session,
                MediaSignal::Error {
                    reason: "source cleared".to_string(),
                },
            )),
            None => {}
        }
    }

    fn start(&mut self) -> std::result::Result<(), String> {
        if let Some(reason) = self.reject_next.take() {
            return Err(reason);
        }
        let Some(source) = self.source.clone() else {
            return Err("no source".to_string());
        };
        self.playing = true;
        self.started.push(source);
        Ok(())
    }

    fn halt(&mut self) {
        self.halts += 1;
        self.playing = false;
    }

    fn set_position(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn apply_volume(&mut self, level: f32, muted: bool) {
        self.volume = (level, muted);
    }

    fn take_signals(&mut self) -> Vec<(SessionId, MediaSignal)> {
        self.queue.drain(..).collect()
    }
}
