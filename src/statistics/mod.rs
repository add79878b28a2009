//! Corpus-wide frequency statistics.

pub mod index;

// Re-export commonly used types
pub use index::{FrequencyStats, StatsConfig, StatsIndex, Tier};
