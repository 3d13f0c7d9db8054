/// Player settings types shared with the persistence layer
use crate::types::Track;
use serde::{Deserialize, Serialize};

/// Volume used when nothing is persisted
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the last track
    #[default]
    Off,
    /// Loop the whole playlist
    All,
    /// Loop the current track
    One,
}

impl RepeatMode {
    /// Next mode in the off → all → one → off cycle
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::All,
            Self::All => Self::One,
            Self::One => Self::Off,
        }
    }

    /// Stored numeric code (0, 1, 2)
    pub fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::All => 1,
            Self::One => 2,
        }
    }

    /// Parse a stored numeric code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Off),
            1 => Some(Self::All),
            2 => Some(Self::One),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::All => "all",
            Self::One => "one",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "all" => Some(Self::All),
            "one" => Some(Self::One),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// UI theme, stored alongside player settings but not used by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The other theme
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

/// Everything the player restores at startup
///
/// Produced by a persistence adapter after validation, so every field holds a
/// usable value even when the backing store was empty or partly corrupt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSettings {
    /// UI theme
    pub theme: Theme,

    /// Saved playlist (never contains transient resources)
    pub playlist: Vec<Track>,

    /// Selection to restore, ignored by the player if out of range
    pub current_index: Option<usize>,

    /// Volume in [0, 1]
    pub volume: f32,

    /// Shuffle enabled
    pub shuffle: bool,

    /// Repeat mode
    pub repeat: RepeatMode,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            playlist: Vec::new(),
            current_index: None,
            volume: DEFAULT_VOLUME,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}
