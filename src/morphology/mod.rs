//! Morphological decomposition of tokens.
//!
//! Splits a token into prefix, middle, and suffix against fixed candidate
//! tables. Decomposition is pure and total: absence of structure is a
//! [`ParseStatus`], never an error.

pub mod extractor;

// Re-export commonly used types
pub use extractor::{MorphologyExtractor, MorphologyResult, ParseStatus};
