//! Turn raw files into playlist tracks

use crate::probe::{LoftyProbe, MetadataProbe};
use crate::resources::TransientResources;
use crate::RawFile;
use encore_core::{format_time, Track};
use std::path::Path;
use tracing::{debug, info, warn};

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Result of one ingestion batch
#[derive(Debug, Default)]
pub struct ImportOutcome {
    /// Tracks ready to be added, in input order
    pub tracks: Vec<Track>,

    /// Names of files that were not accepted
    pub skipped: Vec<String>,
}

/// File importer
///
/// Accepts `audio/*` files only. Each accepted file is kept alive in the
/// [`TransientResources`] registry for the session and becomes a track with a
/// transient source.
pub struct Importer<P = LoftyProbe> {
    resources: TransientResources,
    probe: P,
}

impl Importer {
    pub fn new(resources: TransientResources) -> Self {
        Self::with_probe(resources, LoftyProbe)
    }
}

impl<P: MetadataProbe> Importer<P> {
    pub fn with_probe(resources: TransientResources, probe: P) -> Self {
        Self { resources, probe }
    }

    /// Shared resource registry
    pub fn resources(&self) -> &TransientResources {
        &self.resources
    }

    /// Convert files into tracks, skipping anything that is not audio
    pub fn ingest(&self, files: Vec<RawFile>) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();

        for file in files {
            if !file.is_audio() {
                debug!(file = %file.name, media_type = %file.media_type, "Skipping non-audio file");
                outcome.skipped.push(file.name);
                continue;
            }
            outcome.tracks.push(self.create_track(file));
        }

        info!(
            imported = outcome.tracks.len(),
            skipped = outcome.skipped.len(),
            "Import finished"
        );
        outcome
    }

    /// Read files from disk and ingest them
    ///
    /// Unreadable paths are logged and reported as skipped.
    pub fn ingest_paths<I, T>(&self, paths: I) -> ImportOutcome
    where
        I: IntoIterator<Item = T>,
        T: AsRef<Path>,
    {
        let mut unreadable = Vec::new();
        let files = paths
            .into_iter()
            .filter_map(|path| {
                let path = path.as_ref();
                RawFile::from_path(path)
                    .map_err(|e| {
                        warn!(path = %path.display(), error = %e, "Failed to read file");
                        unreadable.push(path.display().to_string());
                    })
                    .ok()
            })
            .collect();

        let mut outcome = self.ingest(files);
        outcome.skipped.extend(unreadable);
        outcome
    }

    fn create_track(&self, file: RawFile) -> Track {
        let metadata = self.probe.probe(&file);
        let title = metadata.title.unwrap_or_else(|| file.stem().to_string());
        let duration = format_time(metadata.duration_seconds.unwrap_or(0.0));
        let source = self.resources.register(file.bytes);

        debug!(file = %file.name, source = source.uri(), %duration, "Created track from file");
        Track::new(
            title,
            metadata.artist.unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            metadata.album.unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
            source,
        )
        .with_duration_label(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbedMetadata;

    struct FixedProbe(ProbedMetadata);

    impl MetadataProbe for FixedProbe {
        fn probe(&self, _file: &RawFile) -> ProbedMetadata {
            self.0.clone()
        }
    }

    #[test]
    fn untagged_file_uses_defaults() {
        let importer = Importer::with_probe(
            TransientResources::new(),
            FixedProbe(ProbedMetadata::default()),
        );
        let outcome = importer.ingest(vec![RawFile::new("Night Drive.mp3", "audio/mpeg", vec![1])]);

        let track = &outcome.tracks[0];
        assert_eq!(track.title, "Night Drive");
        assert_eq!(track.artist, "Unknown Artist");
        assert_eq!(track.album, "Unknown Album");
        assert_eq!(track.duration_label, "0:00");
        assert!(track.source.is_transient());
        assert!(!track.is_persistable());
    }

    #[test]
    fn tags_override_defaults() {
        let probe = FixedProbe(ProbedMetadata {
            title: Some("Windowlicker".to_string()),
            artist: Some("Aphex Twin".to_string()),
            album: None,
            duration_seconds: Some(367.2),
        });
        let importer = Importer::with_probe(TransientResources::new(), probe);
        let outcome = importer.ingest(vec![RawFile::new("01.flac", "audio/flac", vec![1])]);

        let track = &outcome.tracks[0];
        assert_eq!(track.title, "Windowlicker");
        assert_eq!(track.artist, "Aphex Twin");
        assert_eq!(track.album, "Unknown Album");
        assert_eq!(track.duration_label, "6:07");
    }

    #[test]
    fn non_audio_is_skipped_and_not_registered() {
        let resources = TransientResources::new();
        let importer = Importer::with_probe(resources.clone(), FixedProbe(ProbedMetadata::default()));

        let outcome = importer.ingest(vec![
            RawFile::new("cover.jpg", "image/jpeg", vec![1]),
            RawFile::new("song.ogg", "audio/ogg", vec![2]),
        ]);

        assert_eq!(outcome.tracks.len(), 1);
        assert_eq!(outcome.skipped, vec!["cover.jpg".to_string()]);
        assert_eq!(resources.len(), 1);
    }
}
