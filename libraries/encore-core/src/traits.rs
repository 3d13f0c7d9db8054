/// Collaborator traits for Encore
///
/// The player core calls persistence and resource cleanup through these
/// seams; browser and desktop hosts provide the implementations.
use crate::error::Result;
use crate::types::{PersistedSettings, RepeatMode, ResourceHandle, Theme, Track};

/// Persistence adapter trait
///
/// Read once at startup, written on every mutating player operation.
/// Implementations must validate on read and return defaults for absent or
/// malformed entries rather than failing the whole load.
pub trait PlayerPersistence {
    /// Load validated settings
    ///
    /// # Errors
    /// Returns an error only if the backing store itself is unreadable
    fn load(&mut self) -> Result<PersistedSettings>;

    /// Save the unfiltered playlist, skipping tracks with transient resources
    fn save_playlist(&mut self, tracks: &[Track]) -> Result<()>;

    /// Save the selected position (`None` clears the selection)
    fn save_current_index(&mut self, index: Option<usize>) -> Result<()>;

    /// Save the volume in [0, 1]
    fn save_volume(&mut self, volume: f32) -> Result<()>;

    /// Save the shuffle flag
    fn save_shuffle(&mut self, shuffle: bool) -> Result<()>;

    /// Save the repeat mode
    fn save_repeat(&mut self, repeat: RepeatMode) -> Result<()>;

    /// Save the UI theme
    fn save_theme(&mut self, theme: Theme) -> Result<()>;
}

/// Releases session-scoped resources
///
/// Called for every transient handle owned by a track that leaves the
/// playlist. Releasing a handle twice or releasing a remote handle must be a
/// harmless no-op.
pub trait ResourceReleaser {
    /// Release a handle
    fn release(&self, handle: &ResourceHandle);
}
