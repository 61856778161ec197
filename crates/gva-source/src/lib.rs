//! GVA Source - association table reader
//!
//! Parses the externally supplied tab-separated association tables
//! (variant-disease and gene-disease) into per-publication record
//! lists. The tables come from a foreign pipeline: sentence indices
//! are informational only and character offsets are expressed in that
//! pipeline's own coordinate system, so downstream alignment never
//! trusts them as absolute positions.
//!
//! Reading fails softly: an unreadable table yields no records with a
//! warning, and a malformed row is skipped without aborting the rest
//! of the file.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

pub mod text;

pub use text::{html_unescape, leading_offset, strip_enclosing_quotes};

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised while reading one association table. Callers treat
/// these as "no records from this table", never as fatal.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to open association table {path}")]
    Open {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read row of {path}")]
    Row {
        path: String,
        #[source]
        source: csv::Error,
    },
}

// ============================================================================
// Record Types
// ============================================================================

/// Which association table a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    /// Variant-disease association (dbSNP rsid)
    VariantDisease,
    /// Gene-disease association (Entrez gene id)
    GeneDisease,
}

/// One externally sourced mention pair linking a gene or variant to a
/// disease/trait, tied to an approximate sentence and foreign offsets.
#[derive(Debug, Clone)]
pub struct AssociationRecord {
    pub kind: AssociationKind,

    /// Publication identifier the row is keyed by
    pub pmid: String,

    /// Sentence index in the source corpus; informational, not
    /// authoritative for alignment
    pub sentence_index: String,

    /// dbSNP rsid (variant rows) or Entrez gene id (gene rows)
    pub entity_id: String,

    /// Gene literal text; present on gene rows only
    pub gene_text: Option<String>,

    /// Raw `<int>#...` offset of the variant/gene in the source corpus
    pub entity_offset_raw: String,

    /// Disease identifier from the source vocabulary
    pub disease_id: String,

    /// Disease literal text
    pub disease_text: String,

    /// Raw `<int>#...` offset of the disease in the source corpus
    pub disease_offset_raw: String,

    /// Sentence text, HTML-unescaped with one layer of enclosing
    /// quotes stripped
    pub sentence: String,

    /// Controlled-vocabulary (MeSH) identifier
    pub mesh_id: String,

    /// Mapping-source tag from the source vocabulary
    pub mapping_source: String,
}

impl AssociationRecord {
    /// Leading integer of the raw variant/gene offset
    pub fn entity_offset(&self) -> Option<usize> {
        leading_offset(&self.entity_offset_raw)
    }

    /// Leading integer of the raw disease offset
    pub fn disease_offset(&self) -> Option<usize> {
        leading_offset(&self.disease_offset_raw)
    }

    /// The literal text to locate for the gene/variant side of the
    /// association: the gene's surface form for gene rows, the rsid
    /// itself for variant rows.
    pub fn entity_text(&self) -> &str {
        match self.kind {
            AssociationKind::GeneDisease => self.gene_text.as_deref().unwrap_or(&self.entity_id),
            AssociationKind::VariantDisease => &self.entity_id,
        }
    }
}

// ============================================================================
// Source Reader
// ============================================================================

/// In-memory index of both association tables, keyed by publication id.
/// Variant records precede gene records for each publication.
#[derive(Debug, Default)]
pub struct AssociationSource {
    records: HashMap<String, Vec<AssociationRecord>>,
}

impl AssociationSource {
    /// Load both tables. Missing or unreadable tables are logged and
    /// treated as empty; a bad row never halts reading of later rows.
    pub fn load(variants_path: impl AsRef<Path>, genes_path: impl AsRef<Path>) -> Self {
        let mut source = Self::default();
        source.read_table(variants_path.as_ref(), AssociationKind::VariantDisease);
        source.read_table(genes_path.as_ref(), AssociationKind::GeneDisease);
        source
    }

    /// Association records for one publication, variant rows first.
    pub fn get_records(&self, pmid: &str) -> &[AssociationRecord] {
        self.records.get(pmid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of publications with at least one record
    pub fn publication_count(&self) -> usize {
        self.records.len()
    }

    fn read_table(&mut self, path: &Path, kind: AssociationKind) {
        match self.try_read_table(path, kind) {
            Ok(count) => debug!(path = %path.display(), rows = count, "loaded association table"),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping association table"),
        }
    }

    fn try_read_table(&mut self, path: &Path, kind: AssociationKind) -> Result<usize, SourceError> {
        // Plain tab splitting: the tables carry their own quote
        // characters, stripped one layer at a time below.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .from_path(path)
            .map_err(|e| SourceError::Open {
                path: path.display().to_string(),
                source: e,
            })?;

        let mut count = 0;
        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping unreadable row");
                    continue;
                }
            };
            match parse_row(&row, kind) {
                Some(record) => {
                    count += 1;
                    self.records
                        .entry(record.pmid.clone())
                        .or_default()
                        .push(record);
                }
                None => {
                    debug!(path = %path.display(), "skipping row with missing fields");
                }
            }
        }
        Ok(count)
    }
}

/// Parse one data row. Returns `None` when a required column is
/// missing or empty; the row is excluded without failing the table.
fn parse_row(row: &csv::StringRecord, kind: AssociationKind) -> Option<AssociationRecord> {
    let field = |i: usize| row.get(i).map(str::trim).filter(|s| !s.is_empty());

    let gene_text = match kind {
        AssociationKind::GeneDisease => Some(field(5)?.to_string()),
        AssociationKind::VariantDisease => None,
    };

    Some(AssociationRecord {
        kind,
        pmid: field(0)?.to_string(),
        sentence_index: field(3)?.to_string(),
        entity_id: field(4)?.to_string(),
        gene_text,
        entity_offset_raw: field(6)?.to_string(),
        disease_id: field(7)?.to_string(),
        disease_text: field(8)?.to_string(),
        disease_offset_raw: field(9)?.to_string(),
        sentence: html_unescape(strip_enclosing_quotes(field(10)?)),
        mesh_id: field(11)?.to_string(),
        mapping_source: field(13)?.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================
