//! Folio and line records.

use serde::{Deserialize, Serialize};

use crate::corpus::token::{FolioId, Token};

/// One transcribed line of a folio: an ordered run of tokens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Normalized line number within the folio.
    pub number: u32,

    /// Tokens in position order.
    pub tokens: Vec<Token>,
}

impl LineRecord {
    /// Create an empty line with the given number.
    pub fn new(number: u32) -> Self {
        LineRecord {
            number,
            tokens: Vec::new(),
        }
    }
}

/// One folio of the corpus: an ordered sequence of lines.
///
/// Line ordering is ascending by normalized line number, token ordering is
/// ascending by position within each line; both match the input order of the
/// transcription and are stable across reloads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FolioRecord {
    /// Folio identifier.
    pub id: FolioId,

    /// Optional section/family tag from the folio-features file.
    pub section: Option<String>,

    /// Lines in ascending line-number order.
    pub lines: Vec<LineRecord>,
}

impl FolioRecord {
    /// Create an empty folio record.
    pub fn new(id: FolioId) -> Self {
        FolioRecord {
            id,
            section: None,
            lines: Vec::new(),
        }
    }

    /// Iterate over every token of this folio in (line, position) order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.lines.iter().flat_map(|line| line.tokens.iter())
    }

    /// Total number of token occurrences on this folio.
    pub fn token_count(&self) -> usize {
        self.lines.iter().map(|line| line.tokens.len()).sum()
    }
}
