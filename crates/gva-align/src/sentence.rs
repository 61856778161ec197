//! Sentence resolution
//!
//! Finds, within a passage's text, the sentence most similar to an
//! association record's stored sentence string. Segmentation is a
//! deliberately naive `". "` split (approximate segment boundaries,
//! not linguistic sentence detection) kept behind a trait so a real
//! segmenter can replace it without touching the alignment logic.

use gva_core::BiocPassage;
use strsim::normalized_levenshtein;

// ============================================================================
// Segmentation
// ============================================================================

/// Splits passage text into candidate sentence segments
pub trait Segmenter {
    fn segments<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Fixed-delimiter segmentation on `". "`. Good enough for abstracts;
/// swap in a boundary-aware segmenter for anything richer.
#[derive(Debug, Clone, Default)]
pub struct DelimiterSegmenter;

impl Segmenter for DelimiterSegmenter {
    fn segments<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split(". ").collect()
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// A sentence matched inside a passage
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSentence {
    /// Matched segment text (without the trailing delimiter)
    pub text: String,

    /// Document-absolute offset of the segment:
    /// passage offset + byte index of the segment within the passage
    pub abs_offset: usize,

    /// Similarity ratio of the winning segment, in [0, 1]
    pub score: f64,
}

/// Only abstract body passages are eligible alignment targets: the
/// association source indexes sentences relative to abstracts only.
pub fn is_eligible_passage(passage: &BiocPassage) -> bool {
    passage.infon("section_type") == Some("ABSTRACT")
        && passage
            .infon("type")
            .map(|t| !t.contains("title"))
            .unwrap_or(false)
}

/// Find the segment of `passage_text` most similar to `query`.
///
/// The highest normalized similarity ratio wins, ties broken by first
/// occurrence. Returns `None` when the best ratio falls below
/// `threshold` or the passage has no segments; the record is then not
/// applied to this passage.
pub fn resolve_sentence(
    segmenter: &dyn Segmenter,
    passage_text: &str,
    passage_offset: usize,
    query: &str,
    threshold: f64,
) -> Option<ResolvedSentence> {
    let mut best: Option<(f64, &str)> = None;
    for segment in segmenter.segments(passage_text) {
        let score = normalized_levenshtein(segment, query);
        // Strict ">" keeps the first of equally scored segments.
        if best.map(|(s, _)| score > s).unwrap_or(true) {
            best = Some((score, segment));
        }
    }

    let (score, segment) = best?;
    if segment.is_empty() || score < threshold {
        return None;
    }

    // The segment is a slice of the passage text, so the first
    // occurrence always exists.
    let index = passage_text.find(segment)?;
    Some(ResolvedSentence {
        text: segment.to_string(),
        abs_offset: passage_offset + index,
        score,
    })
}

// ============================================================================
// Tests
// ============================================================================
