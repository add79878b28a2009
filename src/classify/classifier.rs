//! The token classifier.
//!
//! Pure given the frozen table set, the statistics index, and the folio
//! registry: identical input always yields identical output. Results are
//! cached per token text; the cache holds one `OnceLock` slot per key, so
//! concurrent callers compute a classification at most once per distinct
//! token and a miss on one key never blocks lookups of other keys.

use std::sync::{Arc, OnceLock};

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;

use crate::classify::rules::{self, CompiledRuleTables, LocalityClass, SystemLabel, SystemRule};
use crate::morphology::{MorphologyExtractor, MorphologyResult};
use crate::registry::FolioRegistry;
use crate::statistics::{StatsIndex, Tier};
use crate::tables::TableSet;

/// Sentinel label for tokens without a table entry.
pub const UNCLASSIFIED: &str = "UNCLASSIFIED";

/// Complete classification of one token.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    /// Domain label from the token's prefix, or [`UNCLASSIFIED`].
    pub domain: String,

    /// Material-class label from the token's prefix, or [`UNCLASSIFIED`].
    pub material: String,

    /// Token-system label from the rule chain.
    pub system: SystemLabel,

    /// Frequency tier from the statistics index.
    pub tier: Tier,

    /// Locality class from the cross-folio activation count.
    pub locality: LocalityClass,

    /// Name of the system rule that fired.
    pub rule: &'static str,
}

/// Classifies tokens along domain, material, system, and locality axes.
#[derive(Debug)]
pub struct TokenClassifier {
    domain_by_prefix: HashMap<String, String>,
    material_by_prefix: HashMap<String, String>,
    rule_tables: CompiledRuleTables,
    chain: Vec<SystemRule>,
    extractor: Arc<MorphologyExtractor>,
    stats: Arc<StatsIndex>,
    registry: Arc<FolioRegistry>,
    cache: RwLock<AHashMap<String, Arc<OnceLock<Classification>>>>,
}

impl TokenClassifier {
    /// Create a classifier over frozen tables, stats, and registry.
    pub fn new(
        tables: &TableSet,
        extractor: Arc<MorphologyExtractor>,
        stats: Arc<StatsIndex>,
        registry: Arc<FolioRegistry>,
    ) -> Self {
        TokenClassifier {
            domain_by_prefix: tables.domain_by_prefix.clone(),
            material_by_prefix: tables.material_by_prefix.clone(),
            rule_tables: CompiledRuleTables::from_tables(tables),
            chain: rules::default_chain(),
            extractor,
            stats,
            registry,
            cache: RwLock::new(AHashMap::new()),
        }
    }

    /// The rule chain, in evaluation order.
    pub fn rules(&self) -> &[SystemRule] {
        &self.chain
    }

    /// Classify a token, consulting the cache first.
    pub fn classify(&self, token: &str) -> Classification {
        let slot = self.cache.read().get(token).cloned();
        let slot = match slot {
            Some(slot) => slot,
            None => self
                .cache
                .write()
                .entry(token.to_string())
                .or_insert_with(|| Arc::new(OnceLock::new()))
                .clone(),
        };
        slot.get_or_init(|| self.compute(token)).clone()
    }

    /// Resolve only the token-system axis, reporting which rule fired.
    pub fn resolve_system(&self, token: &str) -> (SystemLabel, &'static str) {
        let morphology = self.extractor.decompose(token);
        self.resolve_system_with(token, &morphology)
    }

    fn resolve_system_with(
        &self,
        token: &str,
        morphology: &MorphologyResult,
    ) -> (SystemLabel, &'static str) {
        for rule in &self.chain {
            if let Some(label) = rule.evaluate(token, morphology, &self.rule_tables) {
                return (label, rule.name());
            }
        }
        (SystemLabel::Unclassified, rules::NO_RULE)
    }

    fn compute(&self, token: &str) -> Classification {
        let morphology = self.extractor.decompose(token);
        let (system, rule) = self.resolve_system_with(token, &morphology);
        let lookup = |table: &HashMap<String, String>| {
            table
                .get(&morphology.prefix)
                .cloned()
                .unwrap_or_else(|| UNCLASSIFIED.to_string())
        };

        Classification {
            domain: lookup(&self.domain_by_prefix),
            material: lookup(&self.material_by_prefix),
            system,
            tier: self.stats.get(token).tier,
            locality: LocalityClass::from_folio_count(self.registry.count_folios(token)),
            rule,
        }
    }
}
