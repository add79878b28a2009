//! The corpus statistics index.
//!
//! Aggregates raw occurrence counts per distinct token text over a
//! designated corpus subset, then assigns each token a stable rank
//! (descending count, ties broken by ascending token text) and a frequency
//! tier. Counting is a commutative, associative aggregation, so
//! [`StatsIndex::build_parallel`] can partition the token stream across
//! threads and merge; the sequential build is the reference behavior and
//! both produce identical indices.
//!
//! # Examples
//!
//! ```
//! use scriptorium::statistics::{StatsIndex, Tier};
//!
//! let index = StatsIndex::build(["daiin", "daiin", "chedy"]);
//! let stats = index.get("daiin");
//! assert_eq!(stats.count, 2);
//! assert_eq!(stats.rank, 1);
//!
//! // Lookups are total: absent tokens get sentinel stats, not an error.
//! let absent = index.get("zzz");
//! assert_eq!(absent.count, 0);
//! assert_eq!(absent.tier, Tier::Hapax);
//! ```

use std::fmt;

use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Frequency tier of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Count at or above the core threshold.
    Core,
    /// Top 30% of ranks below the core threshold.
    Common,
    /// Middle 40% of ranks.
    Moderate,
    /// Bottom 30% of ranks.
    Rare,
    /// Exactly one occurrence, or absent from the corpus.
    Hapax,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Tier::Core => "CORE",
            Tier::Common => "COMMON",
            Tier::Moderate => "MODERATE",
            Tier::Rare => "RARE",
            Tier::Hapax => "HAPAX",
        };
        write!(f, "{label}")
    }
}

/// Frequency facts for one token text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyStats {
    /// Raw occurrence count in the designated subset.
    pub count: u64,

    /// 1-based rank; 1 is the most frequent token. A token absent from the
    /// corpus ranks after every present token.
    pub rank: usize,

    /// Frequency tier.
    pub tier: Tier,
}

/// Configuration for tier assignment.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Minimum count for the CORE tier.
    pub core_threshold: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        StatsConfig { core_threshold: 10 }
    }
}

/// Rank-percentile boundary below which a token is COMMON.
const COMMON_BOUNDARY: f64 = 0.30;
/// Rank-percentile boundary below which a token is MODERATE.
const MODERATE_BOUNDARY: f64 = 0.70;

/// Immutable frequency index over one corpus subset.
#[derive(Clone, Debug)]
pub struct StatsIndex {
    stats: AHashMap<String, FrequencyStats>,
    ranked: Vec<String>,
    total: u64,
}

impl StatsIndex {
    /// Build an index with the default configuration.
    pub fn build<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        StatsIndex::build_with_config(tokens, StatsConfig::default())
    }

    /// Build an index with an explicit configuration.
    pub fn build_with_config<I, S>(tokens: I, config: StatsConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: AHashMap<String, u64> = AHashMap::new();
        for token in tokens {
            *counts.entry(token.as_ref().to_string()).or_insert(0) += 1;
        }
        StatsIndex::from_counts(counts, config)
    }

    /// Build an index by counting partitions of the token stream in
    /// parallel and merging. Identical output to the sequential build.
    pub fn build_parallel<S>(tokens: &[S], config: StatsConfig) -> Self
    where
        S: AsRef<str> + Sync,
    {
        let counts = tokens
            .par_iter()
            .fold(AHashMap::<String, u64>::new, |mut counts, token| {
                *counts.entry(token.as_ref().to_string()).or_insert(0) += 1;
                counts
            })
            .reduce(AHashMap::new, |mut left, right| {
                for (token, count) in right {
                    *left.entry(token).or_insert(0) += count;
                }
                left
            });
        StatsIndex::from_counts(counts, config)
    }

    fn from_counts(counts: AHashMap<String, u64>, config: StatsConfig) -> Self {
        let total = counts.values().sum();
        let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
        // Rank order: descending count, ascending text for ties.
        entries.sort_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)));

        let unique = entries.len();
        let mut stats = AHashMap::with_capacity(unique);
        let mut ranked = Vec::with_capacity(unique);
        for (i, (text, count)) in entries.into_iter().enumerate() {
            let rank = i + 1;
            let tier = tier_for(count, rank, unique, config.core_threshold);
            stats.insert(text.clone(), FrequencyStats { count, rank, tier });
            ranked.push(text);
        }

        StatsIndex {
            stats,
            ranked,
            total,
        }
    }

    /// Frequency stats for a token text.
    ///
    /// Total: a token never seen in the corpus yields count 0, a rank one
    /// past every present token, and tier HAPAX.
    pub fn get(&self, token: &str) -> FrequencyStats {
        self.stats.get(token).copied().unwrap_or(FrequencyStats {
            count: 0,
            rank: self.unique_count() + 1,
            tier: Tier::Hapax,
        })
    }

    /// Number of distinct token texts in the subset.
    pub fn unique_count(&self) -> usize {
        self.ranked.len()
    }

    /// Total number of token occurrences counted.
    pub fn total_count(&self) -> u64 {
        self.total
    }

    /// The `n` most frequent tokens in rank order.
    pub fn top(&self, n: usize) -> Vec<(&str, FrequencyStats)> {
        self.ranked
            .iter()
            .take(n)
            .filter_map(|text| self.stats.get(text).map(|stats| (text.as_str(), *stats)))
            .collect()
    }
}

fn tier_for(count: u64, rank: usize, unique: usize, core_threshold: u64) -> Tier {
    if count >= core_threshold {
        return Tier::Core;
    }
    if count <= 1 {
        return Tier::Hapax;
    }
    let percentile = rank as f64 / unique as f64;
    if percentile <= COMMON_BOUNDARY {
        Tier::Common
    } else if percentile <= MODERATE_BOUNDARY {
        Tier::Moderate
    } else {
        Tier::Rare
    }
}
