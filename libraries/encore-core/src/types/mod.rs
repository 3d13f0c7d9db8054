mod ids;
mod settings;
mod track;

pub use ids::TrackId;
pub use settings::{PersistedSettings, RepeatMode, Theme, DEFAULT_VOLUME};
pub use track::{format_time, ResourceHandle, Track, TRANSIENT_SCHEME};
