//! The folio vocabulary registry.
//!
//! Built once from a [`CorpusSnapshot`], the registry records for every
//! folio the set of distinct token texts, the set of distinct middles
//! (derived through the morphology extractor), and which distinct tokens
//! share each middle. It answers two membership relations:
//!
//! - **activation** — the exact token text appears in the folio's
//!   vocabulary (`is_activated`), and
//! - **related middle** — the queried token's middle appears in the folio's
//!   middle vocabulary (`has_related_middle`), a broader, non-exact
//!   relation.
//!
//! Vocabularies are immutable after construction, so cross-folio activation
//! lists are cached per token text; the cache is an optimization only and
//! not part of the contract.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;
use rayon::prelude::*;

use crate::corpus::snapshot::CorpusSnapshot;
use crate::corpus::token::FolioId;
use crate::morphology::MorphologyExtractor;

/// Vocabulary indices for one folio.
#[derive(Clone, Debug, Default)]
pub struct FolioVocabulary {
    tokens: AHashSet<String>,
    middles: AHashSet<String>,
    by_middle: AHashMap<String, Vec<String>>,
    occurrences: u64,
}

impl FolioVocabulary {
    fn record(&mut self, text: &str, middle: &str) {
        self.occurrences += 1;
        let first_sighting = self.tokens.insert(text.to_string());
        if middle.is_empty() {
            return;
        }
        self.middles.insert(middle.to_string());
        if first_sighting {
            self.by_middle
                .entry(middle.to_string())
                .or_default()
                .push(text.to_string());
        }
    }

    /// Exact token-text membership.
    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Middle membership.
    pub fn contains_middle(&self, middle: &str) -> bool {
        self.middles.contains(middle)
    }

    /// Distinct tokens of this folio sharing the given middle.
    pub fn tokens_with_middle(&self, middle: &str) -> &[String] {
        self.by_middle.get(middle).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct token texts on this folio.
    pub fn distinct_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// Number of token occurrences recorded for this folio.
    pub fn occurrences(&self) -> u64 {
        self.occurrences
    }
}

/// Registry of per-folio vocabularies with cross-folio activation queries.
#[derive(Debug)]
pub struct FolioRegistry {
    order: Vec<FolioId>,
    vocabularies: AHashMap<FolioId, FolioVocabulary>,
    extractor: Arc<MorphologyExtractor>,
    activation_cache: RwLock<AHashMap<String, Arc<Vec<FolioId>>>>,
}

impl FolioRegistry {
    /// Build the registry from a snapshot, one pass per folio.
    ///
    /// Folios are independent, so construction partitions by folio across
    /// the rayon pool; the result is identical to a sequential pass.
    pub fn build(snapshot: &CorpusSnapshot, extractor: Arc<MorphologyExtractor>) -> Self {
        let per_folio: Vec<(FolioId, FolioVocabulary)> = snapshot
            .folios()
            .par_iter()
            .map(|folio| {
                let mut vocabulary = FolioVocabulary::default();
                for token in folio.tokens() {
                    let middle = extractor.middle_of(&token.text);
                    vocabulary.record(&token.text, &middle);
                }
                (folio.id.clone(), vocabulary)
            })
            .collect();

        // Snapshot folios are already in folio-key order.
        let order = per_folio.iter().map(|(id, _)| id.clone()).collect();
        let vocabularies = per_folio.into_iter().collect();

        FolioRegistry {
            order,
            vocabularies,
            extractor,
            activation_cache: RwLock::new(AHashMap::new()),
        }
    }

    /// Whether the exact token text appears in the folio's vocabulary.
    ///
    /// O(1) after construction; unknown folios answer false.
    pub fn is_activated(&self, folio: &FolioId, token: &str) -> bool {
        self.vocabularies
            .get(folio)
            .is_some_and(|v| v.contains_token(token))
    }

    /// Whether the queried token's middle appears in the folio's middle
    /// vocabulary. Tokens with an empty middle relate to nothing.
    pub fn has_related_middle(&self, folio: &FolioId, token: &str) -> bool {
        let middle = self.extractor.middle_of(token);
        if middle.is_empty() {
            return false;
        }
        self.vocabularies
            .get(folio)
            .is_some_and(|v| v.contains_middle(&middle))
    }

    /// Every folio whose vocabulary contains the exact token, in folio-key
    /// order. Results are cached per token text.
    pub fn get_activated_folios(&self, token: &str) -> Arc<Vec<FolioId>> {
        if let Some(cached) = self.activation_cache.read().get(token) {
            return Arc::clone(cached);
        }
        let folios: Vec<FolioId> = self
            .order
            .iter()
            .filter(|id| {
                self.vocabularies
                    .get(*id)
                    .is_some_and(|v| v.contains_token(token))
            })
            .cloned()
            .collect();
        let folios = Arc::new(folios);
        self.activation_cache
            .write()
            .entry(token.to_string())
            .or_insert_with(|| Arc::clone(&folios))
            .clone()
    }

    /// Number of folios the token is activated in.
    pub fn count_folios(&self, token: &str) -> usize {
        self.get_activated_folios(token).len()
    }

    /// Number of folios in the registry.
    pub fn folio_count(&self) -> usize {
        self.order.len()
    }

    /// Vocabulary of one folio.
    pub fn vocabulary(&self, folio: &FolioId) -> Option<&FolioVocabulary> {
        self.vocabularies.get(folio)
    }

    /// Sum of per-folio token occurrences; equals the snapshot's total
    /// token count when no token was dropped or double-counted.
    pub fn total_occurrences(&self) -> u64 {
        self.vocabularies.values().map(|v| v.occurrences()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::corpus::loader::{LoaderConfig, TranscriptionLoader};
    use crate::tables::TableSet;

    fn registry_for(input: &str) -> (CorpusSnapshot, FolioRegistry) {
        let snapshot = TranscriptionLoader::new(LoaderConfig::default())
            .load_from_reader(Cursor::new(input))
            .unwrap();
        let extractor = Arc::new(MorphologyExtractor::from_tables(TableSet::embedded()));
        let registry = FolioRegistry::build(&snapshot, extractor);
        (snapshot, registry)
    }

    #[test]
    fn test_activation_matches_vocabulary() {
        let (snapshot, registry) = registry_for(
            "ch\tfA\t1\n\
             ot\tfA\t1\n\
             ch\tfB\t1\n\
             ch\tfB\t2\n",
        );
        for folio in snapshot.folios() {
            for token in folio.tokens() {
                assert!(registry.is_activated(&folio.id, &token.text));
            }
        }
        assert!(!registry.is_activated(&FolioId::new("fA"), "qokaiin"));
        assert!(!registry.is_activated(&FolioId::new("fZ"), "ch"));
    }

    #[test]
    fn test_activated_folios_in_folio_order() {
        let (_, registry) = registry_for(
            "ch\tf10r\t1\n\
             ch\tf2v\t1\n\
             ot\tf10r\t1\n",
        );
        let folios = registry.get_activated_folios("ch");
        let order: Vec<_> = folios.iter().map(|f| f.as_str()).collect();
        assert_eq!(order, vec!["f2v", "f10r"]);
        assert_eq!(registry.count_folios("ch"), 2);
        assert_eq!(registry.count_folios("ot"), 1);
        assert_eq!(registry.count_folios("absent"), 0);
    }

    #[test]
    fn test_activation_cache_is_stable() {
        let (_, registry) = registry_for("ch\tfA\t1\n");
        let first = registry.get_activated_folios("ch");
        let second = registry.get_activated_folios("ch");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_related_middle() {
        let (_, registry) = registry_for(
            "chedaiin\tfA\t1\n\
             daiin\tfA\t1\n",
        );
        let folio = FolioId::new("fA");
        // otedar is not on fA, but its middle "ed" is.
        assert!(registry.has_related_middle(&folio, "otedar"));
        // chedy's middle is empty; it relates to nothing.
        assert!(!registry.has_related_middle(&folio, "chedy"));
        assert!(!registry.has_related_middle(&folio, "qokoiir"));
    }

    #[test]
    fn test_tokens_with_middle_distinct() {
        let (_, registry) = registry_for(
            "chedaiin\tfA\t1\n\
             chedaiin\tfA\t2\n\
             otedar\tfA\t2\n",
        );
        let vocabulary = registry.vocabulary(&FolioId::new("fA")).unwrap();
        let shared = vocabulary.tokens_with_middle("ed");
        assert_eq!(shared.len(), 2);
        assert!(shared.contains(&"chedaiin".to_string()));
        assert!(shared.contains(&"otedar".to_string()));
    }

    #[test]
    fn test_occurrences_sum_to_corpus_total() {
        let (snapshot, registry) = registry_for(
            "ch\tfA\t1\n\
             ot\tfA\t1\n\
             ch\tfB\t1\n\
             daiin\tfC\t1\n\
             daiin\tfC\t2\n",
        );
        assert_eq!(registry.total_occurrences(), snapshot.token_count() as u64);
    }
}
