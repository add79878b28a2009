//! The corpus engine.
//!
//! [`CorpusEngine`] is the facade consumers hold for the lifetime of a
//! research session. Opening it runs the whole build pipeline once: load
//! the transcription, apply folio features, build the statistics index and
//! the folio registry, and wire up the classifier. The result is one
//! immutable [`CorpusState`] behind an `Arc`; any number of readers share
//! it concurrently with no locking.
//!
//! [`CorpusEngine::reload`] is an all-or-nothing swap: a fresh state is
//! built from scratch and exchanged under a write lock. Readers holding the
//! old `Arc` keep a fully consistent view until they drop it; new readers
//! see the new state. No reader ever observes a partially rebuilt corpus.

use std::path::PathBuf;
use std::sync::Arc;

use ahash::AHashMap;
use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::classify::{Classification, TokenClassifier};
use crate::corpus::features;
use crate::corpus::loader::{LoaderConfig, TranscriptionLoader};
use crate::corpus::snapshot::CorpusSnapshot;
use crate::error::Result;
use crate::morphology::MorphologyExtractor;
use crate::registry::FolioRegistry;
use crate::statistics::{StatsConfig, StatsIndex};
use crate::tables::TableSet;

/// Configuration for opening a corpus engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to the transcription source.
    pub corpus_path: PathBuf,

    /// Optional folio-features file (folio → section tag).
    pub features_path: Option<PathBuf>,

    /// Optional table-set file; the embedded default is used when absent.
    pub tables_path: Option<PathBuf>,

    /// Loader configuration.
    pub loader: LoaderConfig,

    /// Statistics configuration.
    pub stats: StatsConfig,

    /// When set, frequency statistics aggregate only the folios carrying
    /// this section tag; the default is the whole corpus.
    pub stats_section: Option<String>,
}

impl EngineConfig {
    /// Configuration with defaults for everything but the corpus path.
    pub fn new<P: Into<PathBuf>>(corpus_path: P) -> Self {
        EngineConfig {
            corpus_path: corpus_path.into(),
            features_path: None,
            tables_path: None,
            loader: LoaderConfig::default(),
            stats: StatsConfig::default(),
            stats_section: None,
        }
    }

    /// Use a folio-features file.
    pub fn with_features<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.features_path = Some(path.into());
        self
    }

    /// Use a table-set file instead of the embedded default.
    pub fn with_tables<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.tables_path = Some(path.into());
        self
    }

    /// Restrict frequency statistics to one section.
    pub fn with_stats_section<S: Into<String>>(mut self, section: S) -> Self {
        self.stats_section = Some(section.into());
        self
    }
}

/// One immutable, fully built view of the corpus and its indices.
#[derive(Debug)]
pub struct CorpusState {
    /// The loaded corpus.
    pub snapshot: Arc<CorpusSnapshot>,

    /// The table set the indices were built with.
    pub tables: Arc<TableSet>,

    /// Morphology extractor over the table set.
    pub extractor: Arc<MorphologyExtractor>,

    /// Frequency statistics over the configured subset.
    pub stats: Arc<StatsIndex>,

    /// Per-folio vocabulary registry.
    pub registry: Arc<FolioRegistry>,

    classifier: TokenClassifier,
}

impl CorpusState {
    /// Classify a token against this state.
    pub fn classify(&self, token: &str) -> Classification {
        self.classifier.classify(token)
    }

    /// The classifier bound to this state.
    pub fn classifier(&self) -> &TokenClassifier {
        &self.classifier
    }
}

/// Facade over one loadable, reloadable corpus.
#[derive(Debug)]
pub struct CorpusEngine {
    config: EngineConfig,
    state: RwLock<Arc<CorpusState>>,
}

impl CorpusEngine {
    /// Load the corpus and build every index.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let state = Self::build_state(&config)?;
        Ok(CorpusEngine {
            config,
            state: RwLock::new(state),
        })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current state. Callers keep the returned `Arc` for as long as
    /// they need a consistent view; a concurrent reload does not affect it.
    pub fn state(&self) -> Arc<CorpusState> {
        self.state.read().clone()
    }

    /// Discard the current state and rebuild from the sources.
    ///
    /// All-or-nothing: on error the previous state stays in place.
    pub fn reload(&self) -> Result<()> {
        let fresh = Self::build_state(&self.config)?;
        *self.state.write() = fresh;
        info!("corpus reloaded from {}", self.config.corpus_path.display());
        Ok(())
    }

    fn build_state(config: &EngineConfig) -> Result<Arc<CorpusState>> {
        let tables = match &config.tables_path {
            Some(path) => Arc::new(TableSet::from_path(path)?),
            None => Arc::new(TableSet::embedded().clone()),
        };

        let loader = TranscriptionLoader::new(config.loader.clone());
        let snapshot = loader.load(&config.corpus_path)?;

        let sections = match &config.features_path {
            Some(path) => features::retain_known(features::load_folio_features(path)?, &snapshot),
            None => AHashMap::new(),
        };
        let snapshot = Arc::new(
            snapshot.with_sections(&sections, &config.loader.fallback_section),
        );

        let extractor = Arc::new(MorphologyExtractor::from_tables(&tables));
        let stats = Arc::new(match &config.stats_section {
            Some(section) => StatsIndex::build_with_config(
                snapshot.section_tokens(section).map(|t| t.text.as_str()),
                config.stats,
            ),
            None => StatsIndex::build_with_config(
                snapshot.tokens().map(|t| t.text.as_str()),
                config.stats,
            ),
        });
        let registry = Arc::new(FolioRegistry::build(&snapshot, Arc::clone(&extractor)));
        let classifier = TokenClassifier::new(
            &tables,
            Arc::clone(&extractor),
            Arc::clone(&stats),
            Arc::clone(&registry),
        );

        Ok(Arc::new(CorpusState {
            snapshot,
            tables,
            extractor,
            stats,
            registry,
            classifier,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    fn corpus_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_open_and_query() {
        let file = corpus_file("daiin\tf1r\t1\nchedy\tf1r\t1\nchedy\tf2r\t1\n");
        let engine = CorpusEngine::open(EngineConfig::new(file.path())).unwrap();
        let state = engine.state();

        assert_eq!(state.snapshot.token_count(), 3);
        assert_eq!(state.stats.get("chedy").count, 2);
        assert_eq!(state.registry.count_folios("chedy"), 2);
        let classification = state.classify("chedy");
        assert_eq!(classification.domain, "botanical");
    }

    #[test]
    fn test_missing_corpus_fails_open() {
        let result = CorpusEngine::open(EngineConfig::new("/no/such/corpus.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_reload_swaps_state_atomically() {
        let mut file = corpus_file("daiin\tf1r\t1\n");
        let engine = CorpusEngine::open(EngineConfig::new(file.path())).unwrap();
        let old_state = engine.state();
        assert_eq!(old_state.snapshot.token_count(), 1);

        writeln!(file, "chedy\tf2r\t1").unwrap();
        file.flush().unwrap();
        engine.reload().unwrap();

        // The old reference stays fully usable; new readers see new state.
        assert_eq!(old_state.snapshot.token_count(), 1);
        assert_eq!(engine.state().snapshot.token_count(), 2);
    }

    #[test]
    fn test_stats_section_subset() {
        let corpus = corpus_file("daiin\tf1r\t1\nchedy\tf67r\t1\nchedy\tf67r\t2\n");
        let features = corpus_file("f1r,herbal\nf67r,astronomical\n");
        let config = EngineConfig::new(corpus.path())
            .with_features(features.path())
            .with_stats_section("astronomical");
        let engine = CorpusEngine::open(config).unwrap();
        let state = engine.state();

        // Only the astronomical folio is counted.
        assert_eq!(state.stats.get("chedy").count, 2);
        assert_eq!(state.stats.get("daiin").count, 0);
        assert_eq!(state.stats.total_count(), 2);
    }
}
