//! Per-folio vocabulary indices and cross-folio activation queries.

pub mod folio_registry;

// Re-export commonly used types
pub use folio_registry::{FolioRegistry, FolioVocabulary};
