//! Precise entity offset resolution
//!
//! The association source's offsets are expressed in its own corpus
//! coordinates, which survive neither re-tokenization nor passage
//! re-flow. Only relative proximity is trustworthy: within the locally
//! resolved sentence, the occurrence of the literal entity text whose
//! start lies closest to the foreign offset is taken as the mention.

use regex::RegexBuilder;

/// Find the start of the occurrence of `needle` in `sentence` closest
/// to `target` (a sentence-relative position derived from the source
/// record's own coordinate system).
///
/// Ties go to the first occurrence by position. Returns `None` when
/// `needle` never occurs in the sentence — the missing-entity
/// condition, on which the caller skips the whole record.
pub fn closest_occurrence(sentence: &str, needle: &str, target: usize) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    let pattern = match RegexBuilder::new(&regex::escape(needle))
        .multi_line(true)
        .build()
    {
        Ok(pattern) => pattern,
        Err(_) => return None,
    };

    let mut closest: Option<(usize, usize)> = None; // (distance, start)
    for occurrence in pattern.find_iter(sentence) {
        let start = occurrence.start();
        let distance = target.abs_diff(start);
        // Strict "<" keeps the earliest of equally distant occurrences.
        if closest.map(|(d, _)| distance < d).unwrap_or(true) {
            closest = Some((distance, start));
        }
    }
    closest.map(|(_, start)| start)
}
