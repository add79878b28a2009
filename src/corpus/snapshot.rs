//! The immutable corpus snapshot.
//!
//! A [`CorpusSnapshot`] is the read-only result of one batch load: every
//! folio, line, and token of the corpus in deterministic order, plus the
//! diagnostics accumulated while loading. All derived structures (statistics
//! index, folio registry, classifications) are computed from a snapshot and
//! never mutate it; a reload builds a fresh snapshot and swaps it in whole.

use ahash::AHashMap;
use serde::Serialize;

use crate::corpus::folio::FolioRecord;
use crate::corpus::loader::LoadDiagnostics;
use crate::corpus::token::{FolioId, Token};

/// Immutable, ordered view of a fully loaded corpus.
#[derive(Clone, Debug, Serialize)]
pub struct CorpusSnapshot {
    folios: Vec<FolioRecord>,
    #[serde(skip)]
    by_id: AHashMap<FolioId, usize>,
    diagnostics: LoadDiagnostics,
}

impl CorpusSnapshot {
    /// Build a snapshot from loaded folio records.
    ///
    /// Folios are sorted by their stable sort key; line and token order
    /// inside each record is preserved as produced by the loader.
    pub fn new(mut folios: Vec<FolioRecord>, diagnostics: LoadDiagnostics) -> Self {
        folios.sort_by(|a, b| a.id.cmp(&b.id));
        let by_id = folios
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        CorpusSnapshot {
            folios,
            by_id,
            diagnostics,
        }
    }

    /// All folios in folio-key order.
    pub fn folios(&self) -> &[FolioRecord] {
        &self.folios
    }

    /// Look up one folio by id.
    pub fn folio(&self, id: &FolioId) -> Option<&FolioRecord> {
        self.by_id.get(id).map(|&i| &self.folios[i])
    }

    /// Iterate over every token of the corpus in (folio, line, position) order.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.folios.iter().flat_map(|f| f.tokens())
    }

    /// Iterate over the tokens of folios carrying the given section tag.
    pub fn section_tokens<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Token> {
        self.folios
            .iter()
            .filter(move |f| f.section.as_deref() == Some(section))
            .flat_map(|f| f.tokens())
    }

    /// Total number of token occurrences in the corpus.
    pub fn token_count(&self) -> usize {
        self.folios.iter().map(|f| f.token_count()).sum()
    }

    /// Diagnostics recorded while loading this snapshot.
    pub fn diagnostics(&self) -> &LoadDiagnostics {
        &self.diagnostics
    }

    /// Return a snapshot with section tags applied from a folio → section
    /// map; folios absent from the map take the fallback section.
    pub fn with_sections(mut self, sections: &AHashMap<FolioId, String>, fallback: &str) -> Self {
        for folio in &mut self.folios {
            folio.section = Some(
                sections
                    .get(&folio.id)
                    .cloned()
                    .unwrap_or_else(|| fallback.to_string()),
            );
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::folio::LineRecord;

    fn snapshot_with(folio_tokens: &[(&str, &[&str])]) -> CorpusSnapshot {
        let folios = folio_tokens
            .iter()
            .map(|(id, tokens)| {
                let id = FolioId::new(*id);
                let mut line = LineRecord::new(1);
                for (pos, text) in tokens.iter().enumerate() {
                    line.tokens
                        .push(Token::new(*text, id.clone(), 1, pos as u32));
                }
                let mut folio = FolioRecord::new(id);
                folio.lines.push(line);
                folio
            })
            .collect();
        CorpusSnapshot::new(folios, LoadDiagnostics::default())
    }

    #[test]
    fn test_folios_sorted_by_key() {
        let snapshot = snapshot_with(&[("f10r", &["a"]), ("f2v", &["b"]), ("f2r", &["c"])]);
        let order: Vec<_> = snapshot.folios().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(order, vec!["f2r", "f2v", "f10r"]);
    }

    #[test]
    fn test_folio_lookup_and_counts() {
        let snapshot = snapshot_with(&[("f1r", &["daiin", "ol"]), ("f1v", &["chedy"])]);
        assert_eq!(snapshot.token_count(), 3);
        assert!(snapshot.folio(&FolioId::new("f1v")).is_some());
        assert!(snapshot.folio(&FolioId::new("f99r")).is_none());
    }

    #[test]
    fn test_with_sections_applies_fallback() {
        let snapshot = snapshot_with(&[("f1r", &["daiin"]), ("f25v", &["ol"])]);
        let mut sections = AHashMap::new();
        sections.insert(FolioId::new("f1r"), "herbal".to_string());

        let snapshot = snapshot.with_sections(&sections, "unknown");
        assert_eq!(
            snapshot.folio(&FolioId::new("f1r")).unwrap().section.as_deref(),
            Some("herbal")
        );
        assert_eq!(
            snapshot.folio(&FolioId::new("f25v")).unwrap().section.as_deref(),
            Some("unknown")
        );
    }
}
