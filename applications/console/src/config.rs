/// Console configuration
use crate::error::{ConsoleError, Result};
use encore_playback::PlayerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file, read when present
pub const DEFAULT_CONFIG_FILE: &str = "encore.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    /// Fixed shuffle seed for reproducible sessions
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            storage: default_storage(),
            seed: None,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `encore.toml` is read if
    /// present. `ENCORE_*` variables override the file, with `__` between
    /// nested keys (`ENCORE_PLAYER__INITIAL_VOLUME=0.5`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings
                .add_source(config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false)),
        };

        // Override with environment variables (prefixed with ENCORE_)
        settings = settings.add_source(
            config::Environment::with_prefix("ENCORE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let player = &self.player;
        if !(0.0..=1.0).contains(&player.initial_volume) {
            return Err(ConsoleError::Config(format!(
                "initial_volume must be within 0.0-1.0, got {}",
                player.initial_volume
            )));
        }
        if !(player.seek_step_secs.is_finite() && player.seek_step_secs > 0.0) {
            return Err(ConsoleError::Config(
                "seek_step_secs must be positive".to_string(),
            ));
        }
        if !(player.volume_step > 0.0 && player.volume_step <= 1.0) {
            return Err(ConsoleError::Config(
                "volume_step must be within (0.0, 1.0]".to_string(),
            ));
        }
        Ok(())
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        state_file: default_state_file(),
    }
}

fn default_state_file() -> PathBuf {
    PathBuf::from("./data/encore-state.json")
}
