//! Transcription loader.
//!
//! Parses the row-oriented transcription file into a [`CorpusSnapshot`].
//! Rows are tab- or comma-delimited with columns:
//!
//! ```text
//! token-text  folio-id  line-number  [placement-code]  [transcriber-id]
//! ```
//!
//! The loader is deliberately tolerant: a transcription assembled from
//! multiple hands contains duplicate readings, illegible words, and locus
//! annotations, none of which may abort a load. Rows from transcribers other
//! than the configured record of truth are skipped, as are rows whose token
//! text is empty or a placeholder and rows whose line number carries no
//! digits at all. Skips are counted in [`LoadDiagnostics`] and logged at
//! debug level; only a missing source file is a fatal error.
//!
//! A header row needs no special handling: its line-number cell has no
//! digits, so it falls out through the normal malformed-row rule.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::corpus::folio::{FolioRecord, LineRecord};
use crate::corpus::snapshot::CorpusSnapshot;
use crate::corpus::token::{FolioId, Token};
use crate::error::{Result, ScriptoriumError};

lazy_static! {
    static ref LINE_NUMBER_RE: Regex = Regex::new(r"\d+").expect("line number pattern");
}

/// Characters that mark a token reading as illegible or uncertain.
const PLACEHOLDER_MARKERS: &[char] = &['?', '*', '!', '%'];

/// Configuration for the transcription loader.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Column delimiter. `None` auto-detects per row: tab when the row
    /// contains one, comma otherwise.
    pub delimiter: Option<char>,

    /// Transcriber of record. Rows carrying a different transcriber id are
    /// skipped; `None` accepts every row.
    pub transcriber: Option<String>,

    /// Section tag assigned to folios absent from the features file.
    pub fallback_section: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            delimiter: None,
            transcriber: Some("H".to_string()),
            fallback_section: "unknown".to_string(),
        }
    }
}

/// Counters accumulated while loading one snapshot.
///
/// Skipped rows never fail a load; these counters exist so callers can
/// report data quality.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadDiagnostics {
    /// Data rows examined (comments and blank lines excluded).
    pub rows_read: u64,

    /// Rows that produced a token.
    pub rows_loaded: u64,

    /// Rows skipped because their transcriber is not the record of truth.
    pub skipped_transcriber: u64,

    /// Rows skipped because a required column was missing, the token text
    /// was empty or a placeholder, or the line number had no digits.
    pub skipped_malformed: u64,
}

impl LoadDiagnostics {
    /// Total number of skipped rows.
    pub fn total_skipped(&self) -> u64 {
        self.skipped_transcriber + self.skipped_malformed
    }
}

/// Loads a transcription source into an immutable [`CorpusSnapshot`].
///
/// # Examples
///
/// ```no_run
/// use scriptorium::corpus::{LoaderConfig, TranscriptionLoader};
///
/// let loader = TranscriptionLoader::new(LoaderConfig::default());
/// let snapshot = loader.load("transcription.txt")?;
/// println!("{} tokens", snapshot.token_count());
/// # Ok::<(), scriptorium::error::ScriptoriumError>(())
/// ```
#[derive(Clone, Debug)]
pub struct TranscriptionLoader {
    config: LoaderConfig,
}

/// One parsed data row, before positions are assigned.
struct RawRow {
    text: String,
    folio: FolioId,
    line: u32,
    placement: Option<String>,
}

impl TranscriptionLoader {
    /// Create a loader with the given configuration.
    pub fn new(config: LoaderConfig) -> Self {
        TranscriptionLoader { config }
    }

    /// The loader's configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a snapshot from a file path.
    ///
    /// Fails with [`ScriptoriumError::SourceNotFound`] when the path does
    /// not exist; malformed rows inside an existing file are skipped, never
    /// fatal.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<CorpusSnapshot> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScriptoriumError::source_not_found(path.display().to_string()));
        }
        let file = File::open(path)?;
        let snapshot = self.load_from_reader(BufReader::new(file))?;
        info!(
            "loaded {} ({} folios, {} tokens, {} rows skipped)",
            path.display(),
            snapshot.folios().len(),
            snapshot.token_count(),
            snapshot.diagnostics().total_skipped()
        );
        Ok(snapshot)
    }

    /// Load a snapshot from any buffered reader.
    pub fn load_from_reader<R: BufRead>(&self, reader: R) -> Result<CorpusSnapshot> {
        let mut diagnostics = LoadDiagnostics::default();
        // Line order within a (folio, line) group is input order, which is
        // the transcription's position order.
        let mut grouped: AHashMap<FolioId, BTreeMap<u32, Vec<RawRow>>> = AHashMap::new();

        for (row_index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            diagnostics.rows_read += 1;

            match self.parse_row(trimmed) {
                RowOutcome::Loaded(row) => {
                    diagnostics.rows_loaded += 1;
                    grouped
                        .entry(row.folio.clone())
                        .or_default()
                        .entry(row.line)
                        .or_default()
                        .push(row);
                }
                RowOutcome::WrongTranscriber => {
                    diagnostics.skipped_transcriber += 1;
                }
                RowOutcome::Malformed(reason) => {
                    diagnostics.skipped_malformed += 1;
                    debug!("skipping row {}: {}", row_index + 1, reason);
                }
            }
        }

        let folios = grouped
            .into_iter()
            .map(|(id, lines)| {
                let mut folio = FolioRecord::new(id.clone());
                for (number, rows) in lines {
                    let mut record = LineRecord::new(number);
                    for (position, row) in rows.into_iter().enumerate() {
                        let mut token = Token::new(row.text, id.clone(), number, position as u32);
                        token.placement = row.placement;
                        record.tokens.push(token);
                    }
                    folio.lines.push(record);
                }
                folio
            })
            .collect();

        Ok(CorpusSnapshot::new(folios, diagnostics))
    }

    fn parse_row(&self, row: &str) -> RowOutcome {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None if row.contains('\t') => '\t',
            None => ',',
        };
        let fields: Vec<&str> = row.split(delimiter).map(str::trim).collect();
        if fields.len() < 3 {
            return RowOutcome::Malformed("fewer than three columns");
        }

        if let (Some(expected), Some(actual)) = (self.config.transcriber.as_deref(), fields.get(4))
        {
            if !actual.is_empty() && *actual != expected {
                return RowOutcome::WrongTranscriber;
            }
        }

        let text = fields[0];
        if !is_legible_token(text) {
            return RowOutcome::Malformed("empty or placeholder token text");
        }

        let folio = fields[1];
        if folio.is_empty() {
            return RowOutcome::Malformed("empty folio id");
        }

        // "14a" normalizes to 14; a cell with no digits is unrecoverable.
        let line = match LINE_NUMBER_RE.find(fields[2]) {
            Some(m) => match m.as_str().parse::<u32>() {
                Ok(n) => n,
                Err(_) => return RowOutcome::Malformed("line number out of range"),
            },
            None => return RowOutcome::Malformed("no digits in line number"),
        };

        let placement = fields
            .get(3)
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string());

        RowOutcome::Loaded(RawRow {
            text: text.to_string(),
            folio: FolioId::new(folio),
            line,
            placement,
        })
    }
}

enum RowOutcome {
    Loaded(RawRow),
    WrongTranscriber,
    Malformed(&'static str),
}

/// A token reading counts as legible when it is non-empty, is not a bare
/// dash, and carries no illegibility markers.
fn is_legible_token(text: &str) -> bool {
    !text.is_empty() && text != "-" && !text.contains(PLACEHOLDER_MARKERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load(input: &str) -> CorpusSnapshot {
        TranscriptionLoader::new(LoaderConfig::default())
            .load_from_reader(Cursor::new(input))
            .unwrap()
    }

    #[test]
    fn test_basic_load_and_ordering() {
        let snapshot = load(
            "daiin\tf1r\t2\n\
             chedy\tf1r\t1\n\
             ol\tf1r\t1\n",
        );
        let folio = snapshot.folio(&FolioId::new("f1r")).unwrap();
        assert_eq!(folio.lines.len(), 2);
        assert_eq!(folio.lines[0].number, 1);
        let texts: Vec<_> = folio.tokens().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["chedy", "ol", "daiin"]);
        assert_eq!(folio.lines[0].tokens[1].position, 1);
    }

    #[test]
    fn test_comma_delimited_rows() {
        let snapshot = load("daiin,f1r,1\nqokaiin,f1v,1\n");
        assert_eq!(snapshot.folios().len(), 2);
        assert_eq!(snapshot.token_count(), 2);
    }

    #[test]
    fn test_transcriber_of_record_filter() {
        let snapshot = load(
            "daiin\tf1r\t1\t\tH\n\
             dain\tf1r\t1\t\tC\n\
             ol\tf1r\t1\t\t\n",
        );
        // The C reading of the same locus is skipped; the empty transcriber
        // column is accepted.
        assert_eq!(snapshot.token_count(), 2);
        assert_eq!(snapshot.diagnostics().skipped_transcriber, 1);
    }

    #[test]
    fn test_placeholder_tokens_skipped() {
        let snapshot = load(
            "???\tf1r\t1\n\
             che*y\tf1r\t1\n\
             -\tf1r\t1\n\
             chedy\tf1r\t1\n",
        );
        assert_eq!(snapshot.token_count(), 1);
        assert_eq!(snapshot.diagnostics().skipped_malformed, 3);
    }

    #[test]
    fn test_line_number_normalization() {
        let snapshot = load(
            "daiin\tf1r\t14a\n\
             ol\tf1r\tlabel\n",
        );
        let folio = snapshot.folio(&FolioId::new("f1r")).unwrap();
        assert_eq!(folio.lines[0].number, 14);
        assert_eq!(snapshot.diagnostics().skipped_malformed, 1);
    }

    #[test]
    fn test_header_row_drops_out() {
        let snapshot = load("word,folio,line\ndaiin,f1r,1\n");
        assert_eq!(snapshot.token_count(), 1);
        assert_eq!(snapshot.diagnostics().skipped_malformed, 1);
    }

    #[test]
    fn test_placement_column() {
        let snapshot = load("otol\tf67r\t0\tL\tH\n");
        let folio = snapshot.folio(&FolioId::new("f67r")).unwrap();
        assert_eq!(folio.lines[0].tokens[0].placement.as_deref(), Some("L"));
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let loader = TranscriptionLoader::new(LoaderConfig::default());
        let err = loader.load("/no/such/transcription.txt").unwrap_err();
        match err {
            ScriptoriumError::SourceNotFound(_) => {}
            other => panic!("expected SourceNotFound, got {other}"),
        }
    }

    #[test]
    fn test_load_is_deterministic() {
        let input = "daiin\tf2r\t1\nchedy\tf1r\t2\nol\tf1r\t1\n";
        let a = load(input);
        let b = load(input);
        let texts = |s: &CorpusSnapshot| -> Vec<String> {
            s.tokens().map(|t| t.text.clone()).collect()
        };
        assert_eq!(texts(&a), texts(&b));
        assert_eq!(a.diagnostics(), b.diagnostics());
    }
}
