//! Core types for playback management

use encore_core::DEFAULT_VOLUME;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one load of the transport
///
/// Sessions come from a monotonically increasing counter. A media signal or
/// pending continuation only takes effect while its session is still the
/// current one.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// Session in effect before anything was loaded
    pub const INITIAL: SessionId = SessionId(0);

    /// Wrap a raw session number (hosts echo these back with media signals)
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw session number
    pub fn raw(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Configuration for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume applied until persisted settings say otherwise (default: 0.7)
    pub initial_volume: f32,

    /// Relative seek step in seconds (default: 10)
    pub seek_step_secs: f64,

    /// Volume nudge step (default: 0.05)
    pub volume_step: f32,

    /// Read and write state through the persistence adapter (default: true)
    pub persist: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: DEFAULT_VOLUME,
            seek_step_secs: 10.0,
            volume_step: 0.05,
            persist: true,
        }
    }
}
