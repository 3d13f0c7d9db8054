//! Encore Importer
//!
//! Turns user-supplied files into playlist tracks.
//!
//! # Architecture
//!
//! - `file`: raw files and media-type detection
//! - `resources`: transient handle registry, released through
//!   [`encore_core::ResourceReleaser`]
//! - `probe`: best-effort tag and duration reading
//! - `importer`: orchestration of a batch
//!
//! # Example
//!
//! ```rust
//! use encore_importer::{Importer, RawFile, TransientResources};
//!
//! let resources = TransientResources::new();
//! let importer = Importer::new(resources.clone());
//!
//! let outcome = importer.ingest(vec![
//!     RawFile::new("demo.mp3", "audio/mpeg", vec![0; 32]),
//!     RawFile::new("notes.txt", "text/plain", b"hello".to_vec()),
//! ]);
//!
//! assert_eq!(outcome.tracks.len(), 1);
//! assert_eq!(outcome.tracks[0].title, "demo");
//! assert_eq!(outcome.tracks[0].duration_label, "0:00");
//! assert_eq!(outcome.skipped, vec!["notes.txt".to_string()]);
//! assert_eq!(resources.len(), 1);
//! ```

mod error;
mod file;

pub mod importer;
pub mod probe;
pub mod resources;

pub use error::ImportError;
pub use file::RawFile;
pub use importer::{ImportOutcome, Importer};
pub use probe::{LoftyProbe, MetadataProbe, ProbedMetadata};
pub use resources::TransientResources;

/// Re-export commonly used types
pub type Result<T> = std::result::Result<T, ImportError>;
