//! Metadata extraction from in-memory audio

use crate::{RawFile, Result};
use lofty::{Accessor, AudioFile, Probe, TaggedFileExt};
use std::io::Cursor;
use tracing::debug;

/// Best-effort metadata of one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbedMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,

    /// Duration in seconds, when known
    pub duration_seconds: Option<f64>,
}

/// Metadata source for imported files
///
/// A probe always resolves: undecodable input yields empty metadata rather
/// than an error.
pub trait MetadataProbe {
    fn probe(&self, file: &RawFile) -> ProbedMetadata;
}

/// Probe backed by lofty's tag and property readers
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyProbe;

impl LoftyProbe {
    fn read(file: &RawFile) -> Result<ProbedMetadata> {
        let tagged_file = Probe::new(Cursor::new(file.bytes.as_slice()))
            .guess_file_type()?
            .read()?;

        let duration = tagged_file.properties().duration().as_secs_f64();
        let mut metadata = ProbedMetadata {
            duration_seconds: (duration > 0.0).then_some(duration),
            ..ProbedMetadata::default()
        };

        if let Some(tag) = tagged_file.primary_tag().or(tagged_file.first_tag()) {
            metadata.title = non_empty(tag.title());
            metadata.artist = non_empty(tag.artist());
            metadata.album = non_empty(tag.album());
        }
        Ok(metadata)
    }
}

impl MetadataProbe for LoftyProbe {
    fn probe(&self, file: &RawFile) -> ProbedMetadata {
        Self::read(file).unwrap_or_else(|e| {
            debug!(file = %file.name, error = %e, "Metadata probe failed");
            ProbedMetadata::default()
        })
    }
}

fn non_empty(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
