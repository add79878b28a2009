//! # Scriptorium
//!
//! Structural and statistical analysis for manuscript transcription corpora.
//!
//! Scriptorium ingests a row-oriented transcription of short textual tokens
//! ("words"), each tagged with a folio, line, and position, and builds
//! queryable structure over them for interactive research tooling:
//!
//! - Per-token morphological decomposition (prefix / middle / suffix)
//! - Corpus-wide frequency statistics with stable ranks and tiers
//! - Per-folio vocabulary indices with cross-folio activation queries
//! - Multi-axis token classification (domain, material, system, locality)
//!
//! The library produces structural and statistical facts only; it does not
//! attempt translation or semantic interpretation of token meaning.
//!
//! ## Quick start
//!
//! ```no_run
//! use scriptorium::engine::{CorpusEngine, EngineConfig};
//!
//! let config = EngineConfig::new("transcription.txt");
//! let engine = CorpusEngine::open(config)?;
//! let state = engine.state();
//!
//! let stats = state.stats.get("daiin");
//! let classification = state.classify("qokaiin");
//! println!("count={} domain={}", stats.count, classification.domain);
//! # Ok::<(), scriptorium::error::ScriptoriumError>(())
//! ```

pub mod classify;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod morphology;
pub mod registry;
pub mod statistics;
pub mod tables;

pub mod prelude {
    //! Commonly used types, re-exported for convenience.

    pub use crate::classify::{
        Classification, LocalityClass, SystemLabel, TokenClassifier, UNCLASSIFIED,
    };
    pub use crate::corpus::{
        CorpusSnapshot, FolioId, FolioRecord, LoadDiagnostics, LoaderConfig, Token,
        TranscriptionLoader,
    };
    pub use crate::engine::{CorpusEngine, CorpusState, EngineConfig};
    pub use crate::error::{Result, ScriptoriumError};
    pub use crate::morphology::{MorphologyExtractor, MorphologyResult, ParseStatus};
    pub use crate::registry::FolioRegistry;
    pub use crate::statistics::{FrequencyStats, StatsIndex, Tier};
    pub use crate::tables::TableSet;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
