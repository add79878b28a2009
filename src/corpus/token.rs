//! Token and folio-identifier types.
//!
//! A [`Token`] is the atomic textual unit of the corpus: the transcribed word
//! together with its position metadata (folio, line, position in line). Tokens
//! are immutable once created and flow unchanged through every downstream
//! index.
//!
//! # Examples
//!
//! ```
//! use scriptorium::corpus::{FolioId, Token};
//!
//! let token = Token::new("qokaiin", FolioId::new("f84v"), 3, 0);
//! assert_eq!(token.text, "qokaiin");
//! assert_eq!(token.line, 3);
//! assert!(token.placement.is_none());
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one folio (page-equivalent unit) of the corpus.
///
/// Folio identifiers like `f84v` or `f101r2` carry a numeric ordinal and a
/// sub-page suffix. Ordering is by numeric ordinal first, then suffix, so
/// `f9v < f10r` even though the strings compare the other way around. This
/// sort key is the stable order used by every registry query that returns
/// folios.
///
/// # Examples
///
/// ```
/// use scriptorium::corpus::FolioId;
///
/// let a = FolioId::new("f9v");
/// let b = FolioId::new("f10r");
/// assert!(a < b);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolioId(String);

impl FolioId {
    /// Create a folio identifier from its textual form.
    pub fn new<S: Into<String>>(id: S) -> Self {
        FolioId(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sort key: numeric ordinal extracted from the first digit run, then the
    /// remainder of the identifier after that run. Identifiers without digits
    /// sort after all numbered folios.
    pub fn sort_key(&self) -> (u32, &str) {
        let bytes = self.0.as_bytes();
        let start = match bytes.iter().position(|b| b.is_ascii_digit()) {
            Some(i) => i,
            None => return (u32::MAX, self.0.as_str()),
        };
        let end = bytes[start..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map(|i| start + i)
            .unwrap_or(bytes.len());
        let ordinal = self.0[start..end].parse::<u32>().unwrap_or(u32::MAX);
        (ordinal, &self.0[end..])
    }
}

impl Ord for FolioId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for FolioId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FolioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FolioId {
    fn from(id: &str) -> Self {
        FolioId::new(id)
    }
}

/// A single transcribed token with its position metadata.
///
/// Immutable once created: the loader builds tokens during ingestion and
/// every derived structure (statistics, registry, classifications) reads
/// them without modification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The transcribed text of the token.
    pub text: String,

    /// Folio the token appears on.
    pub folio: FolioId,

    /// Line number within the folio (normalized to a plain integer).
    pub line: u32,

    /// Position of the token within its line (0-based).
    pub position: u32,

    /// Optional placement code (e.g., a locator for labels and diagram text).
    pub placement: Option<String>,
}

impl Token {
    /// Create a new token with the given text and position metadata.
    pub fn new<S: Into<String>>(text: S, folio: FolioId, line: u32, position: u32) -> Self {
        Token {
            text: text.into(),
            folio,
            line,
            position,
            placement: None,
        }
    }

    /// Attach a placement code to this token.
    pub fn with_placement<S: Into<String>>(mut self, placement: S) -> Self {
        self.placement = Some(placement.into());
        self
    }

    /// Length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check whether the token text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
