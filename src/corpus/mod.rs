//! Corpus ingestion and the immutable snapshot.
//!
//! This module covers the front of the pipeline: parsing the row-oriented
//! transcription source into ordered folio/line/token records and freezing
//! them into a [`CorpusSnapshot`] that every downstream index reads from.

pub mod features;
pub mod folio;
pub mod loader;
pub mod snapshot;
pub mod token;

// Re-export commonly used types
pub use folio::{FolioRecord, LineRecord};
pub use loader::{LoadDiagnostics, LoaderConfig, TranscriptionLoader};
pub use snapshot::CorpusSnapshot;
pub use token::{FolioId, Token};
