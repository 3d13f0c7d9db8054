/// Console error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(#[from] encore_storage::StorageError),

    #[error("Invalid command: {0}")]
    Command(String),
}

impl From<config::ConfigError> for ConsoleError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
