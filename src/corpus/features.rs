//! Folio-features file support.
//!
//! The optional features file maps folio ids to section/family tags
//! (`f1r,herbal`), letting downstream consumers group folios into broader
//! codicological units. Entries referencing folios absent from the loaded
//! transcription are ignored with a warning; they are a recovered
//! diagnostic, not an error.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;
use log::warn;

use crate::corpus::snapshot::CorpusSnapshot;
use crate::corpus::token::FolioId;
use crate::error::{Result, ScriptoriumError};

/// Load a folio → section map from a tab- or comma-delimited file.
///
/// Rows with fewer than two columns or an empty folio id are skipped.
pub fn load_folio_features<P: AsRef<Path>>(path: P) -> Result<AHashMap<FolioId, String>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ScriptoriumError::source_not_found(path.display().to_string()));
    }
    let reader = BufReader::new(File::open(path)?);
    let mut sections = AHashMap::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let delimiter = if trimmed.contains('\t') { '\t' } else { ',' };
        let mut fields = trimmed.split(delimiter).map(str::trim);
        let (folio, section) = match (fields.next(), fields.next()) {
            (Some(f), Some(s)) if !f.is_empty() && !s.is_empty() => (f, s),
            _ => continue,
        };
        sections.insert(FolioId::new(folio), section.to_string());
    }

    Ok(sections)
}

/// Drop feature entries that reference folios missing from the snapshot.
pub fn retain_known(
    mut sections: AHashMap<FolioId, String>,
    snapshot: &CorpusSnapshot,
) -> AHashMap<FolioId, String> {
    sections.retain(|folio, _| {
        let known = snapshot.folio(folio).is_some();
        if !known {
            warn!("features file references unknown folio {folio}, ignoring");
        }
        known
    });
    sections
}
