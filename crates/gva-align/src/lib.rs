//! GVA Align - annotation alignment and relation construction
//!
//! Takes externally sourced association records (gene/variant-disease
//! pairs tied to an approximate sentence and foreign character offsets)
//! and merges them into a BioC document:
//!
//! 1. locate the best-matching sentence in each eligible passage
//!    (fuzzy, threshold-gated),
//! 2. resolve a precise offset for each mentioned entity within that
//!    sentence (nearest occurrence to the foreign offset),
//! 3. build annotations and relations with kind-prefixed monotone ids,
//! 4. deduplicate structurally equivalent relations before attaching
//!    them to the document.
//!
//! Per-record failures (low similarity, missing entity text) are local
//! skips; only structural document problems surface as errors.

pub mod builder;
pub mod dedup;
pub mod offset;
pub mod pipeline;
pub mod sentence;

pub use builder::{ingest_recognized, RecognizedEntity};
pub use dedup::dedupe_relations;
pub use offset::closest_occurrence;
pub use pipeline::{annotate_document, AlignOutcome};
pub use sentence::{resolve_sentence, DelimiterSegmenter, ResolvedSentence, Segmenter};

/// Settings for one alignment run
#[derive(Debug, Clone)]
pub struct AlignConfig {
    /// Minimum normalized similarity for accepting a sentence match
    pub threshold: f64,

    /// Annotator provenance tag written on every annotation and
    /// relation produced from the association source
    pub annotator: String,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            threshold: 0.70,
            annotator: "BeFree@example.com".to_string(),
        }
    }
}

impl AlignConfig {
    /// Build from the application configuration
    pub fn from_app(config: &gva_core::AppConfig) -> Self {
        Self {
            threshold: config.threshold,
            annotator: config.annotator.clone(),
        }
    }
}
