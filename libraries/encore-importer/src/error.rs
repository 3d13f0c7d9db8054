//! Error types for the importer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),
}

impl From<lofty::error::LoftyError> for ImportError {
    fn from(e: lofty::error::LoftyError) -> Self {
        Self::Metadata(e.to_string())
    }
}
