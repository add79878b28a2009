//! The morphology extractor.
//!
//! Decomposition scans an ordered candidate table from the longest string
//! to the shortest and takes the first prefix that matches the front of the
//! token; a separate suffix table is then scanned the same way against the
//! remainder. Whatever lies between the two matches is the middle. The
//! invariant callers rely on: `prefix + middle + suffix` always
//! reconstructs the input exactly.
//!
//! # Examples
//!
//! ```
//! use scriptorium::morphology::{MorphologyExtractor, ParseStatus};
//! use scriptorium::tables::TableSet;
//!
//! let extractor = MorphologyExtractor::from_tables(TableSet::embedded());
//! let result = extractor.decompose("chedaiin");
//! assert_eq!(result.prefix, "ch");
//! assert_eq!(result.middle, "ed");
//! assert_eq!(result.suffix, "aiin");
//! assert_eq!(result.status, ParseStatus::FullyStructured);
//! ```

use serde::{Deserialize, Serialize};

use crate::tables::TableSet;

/// Parse status of a decomposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseStatus {
    /// Prefix and suffix both matched around a non-empty middle.
    FullyStructured,
    /// Prefix and suffix both matched with nothing between them.
    Minimal,
    /// The token does not fit the prefix/suffix structure.
    Unstructured,
}

/// Result of decomposing one token.
///
/// Each component may be empty; concatenating the three always yields the
/// original token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyResult {
    /// Matched prefix, or empty.
    pub prefix: String,

    /// Text between prefix and suffix, or empty.
    pub middle: String,

    /// Matched suffix, or empty.
    pub suffix: String,

    /// How much structure the token exhibited.
    pub status: ParseStatus,
}

impl MorphologyResult {
    /// Reassemble the original token from its parts.
    pub fn reconstruct(&self) -> String {
        format!("{}{}{}", self.prefix, self.middle, self.suffix)
    }

    /// Whether the token parsed against both tables (fully or minimally).
    pub fn is_parsed(&self) -> bool {
        matches!(
            self.status,
            ParseStatus::FullyStructured | ParseStatus::Minimal
        )
    }
}

/// Pure prefix/middle/suffix decomposition over fixed candidate tables.
///
/// Candidates are ordered longest-first at construction; tables are
/// validated for duplicates (the only source of longest-match ambiguity)
/// by [`TableSet::validate`] before they reach the extractor.
#[derive(Clone, Debug)]
pub struct MorphologyExtractor {
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl MorphologyExtractor {
    /// Create an extractor from explicit candidate lists.
    pub fn new(mut prefixes: Vec<String>, mut suffixes: Vec<String>) -> Self {
        let longest_first =
            |a: &String, b: &String| b.len().cmp(&a.len()).then_with(|| a.cmp(b));
        prefixes.sort_by(longest_first);
        suffixes.sort_by(longest_first);
        MorphologyExtractor { prefixes, suffixes }
    }

    /// Create an extractor from a validated table set.
    pub fn from_tables(tables: &TableSet) -> Self {
        MorphologyExtractor::new(tables.prefixes.clone(), tables.suffixes.clone())
    }

    /// Decompose a token into prefix, middle, and suffix.
    ///
    /// Pure and total: no input fails. A suffix may consume the whole
    /// post-prefix remainder only as the minimal form (empty middle);
    /// otherwise it must leave at least one character of middle or match a
    /// shorter tail.
    pub fn decompose(&self, text: &str) -> MorphologyResult {
        if text.is_empty() {
            return MorphologyResult {
                prefix: String::new(),
                middle: String::new(),
                suffix: String::new(),
                status: ParseStatus::Unstructured,
            };
        }

        let prefix = self
            .prefixes
            .iter()
            .find(|p| text.starts_with(p.as_str()))
            .map(String::as_str);
        let remainder = &text[prefix.map_or(0, str::len)..];

        let suffix = self
            .suffixes
            .iter()
            .find(|s| remainder.ends_with(s.as_str()))
            .map(String::as_str);
        let middle = &remainder[..remainder.len() - suffix.map_or(0, str::len)];

        let status = match (prefix, suffix) {
            (Some(_), Some(_)) if middle.is_empty() => ParseStatus::Minimal,
            (Some(_), Some(_)) => ParseStatus::FullyStructured,
            _ => ParseStatus::Unstructured,
        };

        MorphologyResult {
            prefix: prefix.unwrap_or_default().to_string(),
            middle: middle.to_string(),
            suffix: suffix.unwrap_or_default().to_string(),
            status,
        }
    }

    /// Extract only the middle of a token.
    pub fn middle_of(&self, text: &str) -> String {
        self.decompose(text).middle
    }
}
