//! Versioned classification and morphology tables.
//!
//! Every lookup table the pipeline consults — morphology prefix and suffix
//! candidates, prefix → domain and prefix → material maps, the
//! infrastructure token set, and the secondary/hybrid/pattern families —
//! lives in one [`TableSet`] shipped as data. The default set is embedded
//! from `data/tables.json`; research groups maintaining their own tables
//! load them from a file. Updating classification rules never requires
//! touching the classification code.
//!
//! # Validation
//!
//! Morphology matching always takes the longest matching candidate. Two
//! *distinct* candidates of equal length can never both match the same
//! token at the same end, so the longest-match rule is ambiguous only when
//! a table contains duplicates. [`TableSet::validate`] therefore rejects
//! duplicate and empty entries as a fatal configuration error at load time.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use ahash::AHashSet;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptoriumError};

const EMBEDDED_JSON: &str = include_str!("../data/tables.json");

lazy_static! {
    static ref EMBEDDED: TableSet = {
        let tables: TableSet =
            serde_json::from_str(EMBEDDED_JSON).expect("embedded table data parses");
        tables.validate().expect("embedded table data is valid");
        tables
    };
}

/// The consolidated, versioned table configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableSet {
    /// Format version of the table data.
    pub version: u32,

    /// Morphology prefix candidates (primary system).
    pub prefixes: Vec<String>,

    /// Morphology suffix candidates.
    pub suffixes: Vec<String>,

    /// Prefix → domain label.
    pub domain_by_prefix: HashMap<String, String>,

    /// Prefix → material-class label.
    pub material_by_prefix: HashMap<String, String>,

    /// Tokens classified as infrastructure by literal match.
    pub infrastructure_tokens: Vec<String>,

    /// Alternate prefix family (secondary token system).
    pub secondary_prefixes: Vec<String>,

    /// Suffixes that mark a secondary-prefix token as a hybrid variant.
    pub hybrid_suffixes: Vec<String>,

    /// Broader pattern prefix family.
    pub pattern_prefixes: Vec<String>,
}

impl TableSet {
    /// The embedded default table set.
    pub fn embedded() -> &'static TableSet {
        &EMBEDDED
    }

    /// Load and validate a table set from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<TableSet> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScriptoriumError::source_not_found(path.display().to_string()));
        }
        let tables: TableSet = serde_json::from_str(&fs::read_to_string(path)?)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Check the table invariants; violations are fatal configuration
    /// errors, never silently tolerated.
    pub fn validate(&self) -> Result<()> {
        if self.version == 0 {
            return Err(ScriptoriumError::config("table version must be at least 1"));
        }
        check_candidates("prefixes", &self.prefixes)?;
        check_candidates("suffixes", &self.suffixes)?;
        check_candidates("infrastructure_tokens", &self.infrastructure_tokens)?;
        check_candidates("secondary_prefixes", &self.secondary_prefixes)?;
        check_candidates("hybrid_suffixes", &self.hybrid_suffixes)?;
        check_candidates("pattern_prefixes", &self.pattern_prefixes)?;
        Ok(())
    }
}

fn check_candidates(table: &str, entries: &[String]) -> Result<()> {
    let mut seen = AHashSet::new();
    for entry in entries {
        if entry.is_empty() {
            return Err(ScriptoriumError::config(format!(
                "table '{table}' contains an empty entry"
            )));
        }
        if !seen.insert(entry.as_str()) {
            return Err(ScriptoriumError::config(format!(
                "table '{table}' contains duplicate entry '{entry}'"
            )));
        }
    }
    Ok(())
}
