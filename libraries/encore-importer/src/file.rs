//! Raw files handed to the importer

use crate::{ImportError, Result};
use std::path::Path;

/// A file as received from a picker, a drop or the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    /// File name including extension
    pub name: String,

    /// Media type, e.g. `audio/mpeg`
    pub media_type: String,

    /// File contents
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its media type from the extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ImportError::InvalidPath(path.display().to_string()))?
            .to_string();
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let bytes = std::fs::read(path)?;

        Ok(Self::new(name, media_type, bytes))
    }

    /// Whether the media type is `audio/*`
    pub fn is_audio(&self) -> bool {
        self.media_type.starts_with("audio/")
    }

    /// Name with the last extension removed
    ///
    /// Falls back to the full name when nothing would remain.
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() && !ext.contains('/') => {
                stem
            }
            _ => &self.name,
        }
    }
}
