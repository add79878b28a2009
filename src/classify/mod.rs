//! Multi-axis token classification.
//!
//! Combines the morphology extractor, the statistics index, and the folio
//! registry to assign each token a domain, a material class, a token-system
//! label, and a locality class. Classification is deterministic and
//! side-effect free; results are cached per token text.

pub mod classifier;
pub mod rules;

// Re-export commonly used types
pub use classifier::{Classification, TokenClassifier, UNCLASSIFIED};
pub use rules::{LocalityClass, SystemLabel, SystemRule};
