//! Transport: the single playable media resource
//!
//! The transport owns the observable playback state and talks to the actual
//! medium through [`MediaBackend`]. Every load is tagged with a
//! [`SessionId`]; signals the backend reports for any other session are
//! dropped here, so a superseded load can never touch the state.

use crate::error::{PlaybackError, Result};
use crate::events::{MediaSignal, TransportEvent};
use crate::types::SessionId;
use crate::volume::Volume;
use encore_core::ResourceHandle;
use tracing::trace;

/// Platform media element
///
/// Implementors drive the real medium (a browser audio element, a desktop
/// decoder, a simulation). Lifecycle signals are reported back tagged with the
/// session passed to the most recent [`set_source`](Self::set_source), either
/// pushed by the host into the player or pulled through
/// [`take_signals`](Self::take_signals).
pub trait MediaBackend {
    /// Swap the source; `None` clears it and aborts any in-flight fetch
    fn set_source(&mut self, session: SessionId, resource: Option<&ResourceHandle>);

    /// Start or resume playback
    ///
    /// # Errors
    /// Returns the reason when the medium refuses to start
    fn start(&mut self) -> std::result::Result<(), String>;

    /// Pause playback
    fn halt(&mut self);

    /// Move the playhead
    fn set_position(&mut self, seconds: f64);

    /// Apply output volume (0.0-1.0) and mute
    fn apply_volume(&mut self, level: f32, muted: bool);

    /// Drain signals queued since the last call
    fn take_signals(&mut self) -> Vec<(SessionId, MediaSignal)> {
        Vec::new()
    }
}

/// Observable transport state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransportState {
    /// Resource currently assigned to the medium
    pub loaded_resource: Option<ResourceHandle>,

    /// Whether audio is playing
    pub is_playing: bool,

    /// Playhead in seconds
    pub position_seconds: f64,

    /// Duration in seconds, once metadata is known
    pub duration_seconds: Option<f64>,

    /// Output volume and mute
    pub volume: Volume,
}

/// Wraps exactly one playable resource at a time
#[derive(Debug)]
pub struct Transport<B> {
    backend: B,
    state: TransportState,
    session: SessionId,
    scrubbing: bool,
}

impl<B: MediaBackend> Transport<B> {
    /// Create a transport around a backend
    pub fn new(backend: B, volume: Volume) -> Self {
        let mut transport = Self {
            backend,
            state: TransportState {
                volume,
                ..TransportState::default()
            },
            session: SessionId::INITIAL,
            scrubbing: false,
        };
        transport.push_volume();
        transport
    }

    /// Assign a new source under `session`
    pub fn load(&mut self, session: SessionId, resource: &ResourceHandle) {
        self.session = session;
        self.scrubbing = false;
        self.state.loaded_resource = Some(resource.clone());
        self.state.is_playing = false;
        self.state.position_seconds = 0.0;
        self.state.duration_seconds = None;
        self.backend.set_source(session, Some(resource));
    }

    /// Clear the source under `session`, stopping any in-flight load
    pub fn unload(&mut self, session: SessionId) {
        self.session = session;
        self.scrubbing = false;
        self.state.loaded_resource = None;
        self.state.is_playing = false;
        self.state.position_seconds = 0.0;
        self.state.duration_seconds = None;
        self.backend.set_source(session, None);
    }

    /// Start playback
    ///
    /// Never marks the transport as playing unless the medium accepted.
    pub fn play(&mut self) -> Result<()> {
        if self.state.loaded_resource.is_none() {
            return Err(PlaybackError::PlaybackRejected(
                "no track loaded".to_string(),
            ));
        }
        if self.state.is_playing {
            return Ok(());
        }

        self.backend
            .start()
            .map_err(PlaybackError::PlaybackRejected)?;
        self.state.is_playing = true;
        Ok(())
    }

    /// Pause playback
    ///
    /// Returns `false` (and touches nothing) when already paused.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_playing {
            return false;
        }
        self.backend.halt();
        self.state.is_playing = false;
        true
    }

    /// Seek within the loaded resource, clamped to `[0, duration]`
    ///
    /// Returns the applied position, or `None` while the duration is unknown.
    pub fn seek(&mut self, seconds: f64) -> Option<f64> {
        let duration = self.state.duration_seconds?;
        let target = if seconds.is_finite() {
            seconds.clamp(0.0, duration)
        } else {
            0.0
        };
        self.backend.set_position(target);
        self.state.position_seconds = target;
        Some(target)
    }

    /// Move the playhead back to the start of the loaded resource
    pub fn rewind(&mut self) {
        if self.state.loaded_resource.is_some() {
            self.backend.set_position(0.0);
            self.state.position_seconds = 0.0;
        }
    }

    /// Set output volume, clamped to 0.0-1.0; returns the applied level
    pub fn set_volume(&mut self, level: f32) -> f32 {
        self.state.volume.set_level(level);
        self.push_volume();
        self.state.volume.level()
    }

    /// Mute or unmute
    pub fn set_muted(&mut self, muted: bool) {
        self.state.volume.set_muted(muted);
        self.push_volume();
    }

    /// Suspend position reflection while the user drags the progress bar
    pub fn begin_scrub(&mut self) {
        self.scrubbing = true;
    }

    /// Resume position reflection
    pub fn end_scrub(&mut self) {
        self.scrubbing = false;
    }

    /// Whether a scrub is in progress
    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    /// Translate a backend signal into a transport event
    ///
    /// Signals for any session other than the current one are dropped.
    pub fn accept(&mut self, session: SessionId, signal: MediaSignal) -> Option<TransportEvent> {
        if session != self.session {
            trace!(%session, current = %self.session, ?signal, "Dropping stale media signal");
            return None;
        }

        match signal {
            MediaSignal::LoadStarted => Some(TransportEvent::LoadStarted),
            MediaSignal::MetadataReady { duration } => {
                if duration.is_finite() && duration > 0.0 {
                    self.state.duration_seconds = Some(duration);
                    Some(TransportEvent::MetadataReady(duration))
                } else {
                    None
                }
            }
            MediaSignal::ReadyToPlay => Some(TransportEvent::ReadyToPlay),
            MediaSignal::TimeUpdate { position } => {
                if self.scrubbing || self.state.loaded_resource.is_none() || !position.is_finite()
                {
                    return None;
                }
                let position = match self.state.duration_seconds {
                    Some(duration) => position.clamp(0.0, duration),
                    None => position.max(0.0),
                };
                self.state.position_seconds = position;
                Some(TransportEvent::PositionChanged(position))
            }
            MediaSignal::Ended => {
                self.state.is_playing = false;
                if let Some(duration) = self.state.duration_seconds {
                    self.state.position_seconds = duration;
                }
                Some(TransportEvent::Ended)
            }
            MediaSignal::Error { reason } => {
                self.state.is_playing = false;
                Some(TransportEvent::Error(reason))
            }
            MediaSignal::PlayRejected { reason } => {
                self.state.is_playing = false;
                Some(TransportEvent::PlayRejected(reason))
            }
        }
    }

    /// Drain queued backend signals
    pub fn take_signals(&mut self) -> Vec<(SessionId, MediaSignal)> {
        self.backend.take_signals()
    }

    /// Current state
    pub fn state(&self) -> &TransportState {
        &self.state
    }

    /// Session of the current source
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Whether audio is playing
    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    /// Whether a source is assigned
    pub fn has_source(&self) -> bool {
        self.state.loaded_resource.is_some()
    }

    /// Borrow the backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutably borrow the backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn push_volume(&mut self) {
        let volume = self.state.volume;
        self.backend.apply_volume(volume.level(), volume.is_muted());
    }
}
