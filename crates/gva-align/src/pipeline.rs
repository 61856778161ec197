//! Per-publication alignment pipeline
//!
//! Drives sentence resolution, offset resolution, annotation/relation
//! construction, and deduplication for one document. The document is
//! mutated in place: annotations land on their matched passages,
//! deduplicated relations on the document. One [`IdAllocator`] spans
//! the whole call, so identifiers stay monotone across passages.

use gva_core::{BiocDocument, GvaError, IdAllocator, Result};
use gva_source::AssociationRecord;
use tracing::{debug, info, warn};

use crate::builder::{apply_record, now_timestamp};
use crate::dedup::dedupe_relations;
use crate::sentence::{is_eligible_passage, resolve_sentence, DelimiterSegmenter};
use crate::AlignConfig;

/// Counters from one alignment run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignOutcome {
    /// Annotations appended to passages
    pub annotations_added: usize,

    /// Relations attached to the document after deduplication
    pub relations_attached: usize,

    /// Record/passage pairs rejected below the similarity threshold
    pub skipped_low_similarity: usize,

    /// Records skipped because an entity literal was absent from its
    /// resolved sentence
    pub skipped_missing_entity: usize,
}

impl AlignOutcome {
    /// Whether any record failed offset resolution; flags low-quality
    /// alignment for downstream reporting without halting the run.
    pub fn missing_entities(&self) -> bool {
        self.skipped_missing_entity > 0
    }
}

/// Merge association records into `document`.
///
/// Per-record failures are local skips reflected in the outcome
/// counters. Only structural model violations return `Err`, and they
/// affect this publication alone.
pub fn annotate_document(
    document: &mut BiocDocument,
    records: &[AssociationRecord],
    config: &AlignConfig,
) -> Result<AlignOutcome> {
    if document.passages.is_empty() {
        return Err(GvaError::Structural(format!(
            "document {} has no passages",
            document.id
        )));
    }

    let pmid = document.pmid().unwrap_or(&document.id).to_string();
    let segmenter = DelimiterSegmenter;
    let mut alloc = IdAllocator::new();
    let now = now_timestamp();
    let mut outcome = AlignOutcome::default();
    let mut pending = Vec::new();

    for passage in document.passages.iter_mut() {
        if !is_eligible_passage(passage) {
            continue;
        }
        for record in records {
            let resolved = match resolve_sentence(
                &segmenter,
                &passage.text,
                passage.offset,
                &record.sentence,
                config.threshold,
            ) {
                Some(resolved) => resolved,
                None => {
                    outcome.skipped_low_similarity += 1;
                    debug!(pmid = %pmid, sentence = %record.sentence, "no sentence above threshold");
                    continue;
                }
            };

            let before = passage.annotations.len();
            match apply_record(
                passage,
                record,
                &resolved,
                &mut alloc,
                &config.annotator,
                &now,
            ) {
                Some(relation) => {
                    outcome.annotations_added += passage.annotations.len() - before;
                    pending.push(relation);
                }
                None => {
                    outcome.skipped_missing_entity += 1;
                    debug!(
                        pmid = %pmid,
                        entity = record.entity_text(),
                        disease = %record.disease_text,
                        "entity text absent from resolved sentence"
                    );
                }
            }
        }
    }

    let deduped = dedupe_relations(pending);
    outcome.relations_attached = deduped.len();
    document.relations.extend(deduped);

    document.validate_relations()?;

    if outcome.missing_entities() {
        warn!(pmid = %pmid, "publication contains missing entities from sentences");
    }
    info!(
        pmid = %pmid,
        annotations = outcome.annotations_added,
        relations = outcome.relations_attached,
        skipped_low_similarity = outcome.skipped_low_similarity,
        skipped_missing_entity = outcome.skipped_missing_entity,
        "alignment finished"
    );

    Ok(outcome)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gva_core::BiocPassage;
    use gva_source::AssociationKind;
    use std::collections::HashMap;

    fn abstract_passage(offset: usize, text: &str) -> BiocPassage {
        let mut infons = HashMap::new();
        infons.insert("article-id_pmid".to_string(), "111".to_string());
        infons.insert("section_type".to_string(), "ABSTRACT".to_string());
        infons.insert("type".to_string(), "paragraph".to_string());
        BiocPassage {
            infons,
            offset,
            text: text.to_string(),
            ..Default::default()
        }
    }

    fn document(passages: Vec<BiocPassage>) -> BiocDocument {
        BiocDocument {
            id: "111".to_string(),
            passages,
            ..Default::default()
        }
    }

    fn variant_record(sentence: &str, entity: &str, disease: &str) -> AssociationRecord {
        AssociationRecord {
            kind: AssociationKind::VariantDisease,
            pmid: "111".to_string(),
            sentence_index: "0".to_string(),
            entity_id: entity.to_string(),
            gene_text: None,
            entity_offset_raw: "0#s".to_string(),
            disease_id: "C0011849".to_string(),
            disease_text: disease.to_string(),
            disease_offset_raw: "0#s".to_string(),
            sentence: sentence.to_string(),
            mesh_id: "D003920".to_string(),
            mapping_source: "BEFREE".to_string(),
        }
    }

    #[test]
    fn aligns_variant_association_end_to_end() {
        // Scenario: record sentence matches the first passage segment
        let mut doc = document(vec![abstract_passage(
            50,
            "Rs123 was associated with diabetes. Other findings follow.",
        )]);
        let records = vec![variant_record(
            "Rs123 was associated with diabetes.",
            "Rs123",
            "diabetes",
        )];

        let outcome = annotate_document(&mut doc, &records, &AlignConfig::default()).unwrap();

        assert_eq!(outcome.annotations_added, 2);
        assert_eq!(outcome.relations_attached, 1);
        assert!(!outcome.missing_entities());

        let annotations = &doc.passages[0].annotations;
        assert_eq!(annotations[0].id, "T0");
        assert_eq!(annotations[0].text, "diabetes");
        assert_eq!(annotations[0].locations[0].offset, 50 + 26);
        assert_eq!(annotations[1].id, "V0");
        assert_eq!(annotations[1].text, "Rs123");
        assert_eq!(annotations[1].locations[0].offset, 50);

        assert_eq!(doc.relations.len(), 1);
        let relation = &doc.relations[0];
        assert_eq!(relation.relation_type(), Some("GeneticVariant_Trait"));
        assert_eq!(relation.nodes[0].refid, "T0");
        assert_eq!(relation.nodes[1].refid, "V0");
        assert!(doc.validate_relations().is_ok());
    }

    #[test]
    fn dissimilar_sentence_is_skipped_and_processing_continues() {
        // Scenario: first record matches nothing; the second still lands
        let mut doc = document(vec![abstract_passage(
            0,
            "Rs123 was associated with diabetes. Other findings follow.",
        )]);
        let records = vec![
            variant_record("An entirely different claim about kidneys.", "Rs9", "kidney"),
            variant_record("Rs123 was associated with diabetes.", "Rs123", "diabetes"),
        ];

        let outcome = annotate_document(&mut doc, &records, &AlignConfig::default()).unwrap();

        assert_eq!(outcome.skipped_low_similarity, 1);
        assert_eq!(outcome.relations_attached, 1);
        assert_eq!(doc.passages[0].annotations.len(), 2);
    }

    #[test]
    fn missing_entity_flags_publication_without_partial_output() {
        // Scenario: sentence resolves but the rsid never occurs in it
        let mut doc = document(vec![abstract_passage(
            0,
            "Rs123 was associated with diabetes. Other findings follow.",
        )]);
        let records = vec![variant_record(
            "Rs123 was associated with diabetes.",
            "Rs777",
            "diabetes",
        )];

        let outcome = annotate_document(&mut doc, &records, &AlignConfig::default()).unwrap();

        assert_eq!(outcome.skipped_missing_entity, 1);
        assert!(outcome.missing_entities());
        assert!(doc.passages[0].annotations.is_empty());
        assert!(doc.relations.is_empty());
    }

    #[test]
    fn duplicate_rows_yield_one_relation() {
        // Scenario: two redundant rows describe the same pair
        let mut doc = document(vec![abstract_passage(
            0,
            "Rs123 was associated with diabetes. Other findings follow.",
        )]);
        let record = variant_record("Rs123 was associated with diabetes.", "Rs123", "diabetes");
        let records = vec![record.clone(), record];

        let outcome = annotate_document(&mut doc, &records, &AlignConfig::default()).unwrap();

        // The redundant row reused the first row's annotations, and the
        // structurally equivalent relation was dropped.
        assert_eq!(outcome.annotations_added, 2);
        assert_eq!(outcome.relations_attached, 1);
        assert_eq!(doc.passages[0].annotations.len(), 2);
        assert_eq!(doc.relations.len(), 1);
        assert_eq!(doc.relations[0].nodes[0].refid, "T0");
    }

    #[test]
    fn counters_span_all_passages() {
        let mut doc = document(vec![
            abstract_passage(0, "Rs123 was associated with diabetes. Filler."),
            abstract_passage(100, "Rs456 was associated with glaucoma. Filler."),
        ]);
        let records = vec![
            variant_record("Rs123 was associated with diabetes.", "Rs123", "diabetes"),
            variant_record("Rs456 was associated with glaucoma.", "Rs456", "glaucoma"),
        ];

        annotate_document(&mut doc, &records, &AlignConfig::default()).unwrap();

        let ids: Vec<&str> = doc
            .passages
            .iter()
            .flat_map(|p| p.annotations.iter())
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["T0", "V0", "T1", "V1"]);
        assert_eq!(doc.relations.len(), 2);
        assert_eq!(doc.relations[1].id, "R1");
    }

    #[test]
    fn title_passage_is_not_an_alignment_target() {
        let mut title = abstract_passage(0, "Rs123 was associated with diabetes.");
        title
            .infons
            .insert("type".to_string(), "title".to_string());
        let mut doc = document(vec![title]);
        let records = vec![variant_record(
            "Rs123 was associated with diabetes.",
            "Rs123",
            "diabetes",
        )];

        let outcome = annotate_document(&mut doc, &records, &AlignConfig::default()).unwrap();
        assert_eq!(outcome.annotations_added, 0);
        assert!(doc.relations.is_empty());
    }

    #[test]
    fn document_without_passages_is_a_structural_failure() {
        let mut doc = document(vec![]);
        let err = annotate_document(&mut doc, &[], &AlignConfig::default()).unwrap_err();
        assert!(matches!(err, GvaError::Structural(_)));
    }

    #[test]
    fn foreign_offset_magnitude_does_not_move_the_location() {
        // Re-basing property: wildly different source offsets resolve to
        // the same (single) occurrence.
        for raw in ["0#s", "5000#s", "999999#s"] {
            let mut doc = document(vec![abstract_passage(
                10,
                "Rs123 was associated with diabetes. Filler.",
            )]);
            let mut record =
                variant_record("Rs123 was associated with diabetes.", "Rs123", "diabetes");
            record.disease_offset_raw = raw.to_string();

            annotate_document(&mut doc, &[record], &AlignConfig::default()).unwrap();
            assert_eq!(doc.passages[0].annotations[0].locations[0].offset, 10 + 26);
        }
    }
}
