//! Annotation and relation construction
//!
//! Builds BioC annotations and relations from fully resolved
//! association records, and converts externally recognized mentions
//! into the same annotation model. Identifiers come from the
//! per-publication [`IdAllocator`]; nothing is allocated or appended
//! until every constituent offset of a record has resolved, so a
//! failing record leaves no partial annotations behind.

use chrono::Utc;
use gva_core::{BiocAnnotation, BiocLocation, BiocPassage, BiocRelation, EntityKind, IdAllocator};
use gva_source::{AssociationKind, AssociationRecord};

use crate::offset::closest_occurrence;
use crate::sentence::ResolvedSentence;

/// Current UTC time in the `updated_at` infon format
pub fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// An annotation already on the passage with the same type,
/// identifier, and location describes the same mention; reusing its id
/// lets redundant source rows collapse into one relation downstream.
fn existing_annotation_id(
    passage: &BiocPassage,
    infon_type: &str,
    identifier: &str,
    location: BiocLocation,
) -> Option<String> {
    passage
        .annotations
        .iter()
        .find(|a| {
            a.infons.get("type").map(String::as_str) == Some(infon_type)
                && a.infons.get("identifier").map(String::as_str) == Some(identifier)
                && a.locations.contains(&location)
        })
        .map(|a| a.id.clone())
}

// ============================================================================
// Association-derived annotations
// ============================================================================

/// Apply one association record to a passage whose sentence has
/// already been resolved.
///
/// Resolves both entity offsets first; returns `None` (the
/// missing-entity condition) without touching the passage if either
/// literal is absent from the sentence or a raw offset is unparseable.
/// On success the trait and gene/variant annotations are appended to
/// the passage (reusing an identical existing mention instead of
/// duplicating it) and the linking relation is returned for later
/// deduplication.
pub fn apply_record(
    passage: &mut BiocPassage,
    record: &AssociationRecord,
    resolved: &ResolvedSentence,
    alloc: &mut IdAllocator,
    annotator: &str,
    now: &str,
) -> Option<BiocRelation> {
    let disease_at = closest_occurrence(
        &resolved.text,
        &record.disease_text,
        record.disease_offset()?,
    )?;
    let entity_at = closest_occurrence(
        &resolved.text,
        record.entity_text(),
        record.entity_offset()?,
    )?;

    let trait_identifier = format!("MeSH:{}", record.mesh_id);
    let trait_location = BiocLocation {
        offset: resolved.abs_offset + disease_at,
        length: record.disease_text.len(),
    };

    let (kind, entity_identifier, relation_type) = match record.kind {
        AssociationKind::VariantDisease => (
            EntityKind::Variant,
            format!("dbSNP:{}", record.entity_id),
            "GeneticVariant_Trait",
        ),
        AssociationKind::GeneDisease => (
            EntityKind::Gene,
            format!("Entrez:{}", record.entity_id),
            "Gene_Trait",
        ),
    };
    let entity_text = record.entity_text().to_string();
    let entity_location = BiocLocation {
        offset: resolved.abs_offset + entity_at,
        length: entity_text.len(),
    };

    let trait_type = EntityKind::Trait.infon_type();
    let trait_id = match existing_annotation_id(passage, trait_type, &trait_identifier, trait_location)
    {
        Some(id) => id,
        None => {
            let annotation = BiocAnnotation::new(alloc.next(EntityKind::Trait), &record.disease_text)
                .with_infon("type", trait_type)
                .with_infon("identifier", trait_identifier)
                .with_infon("annotator", annotator)
                .with_infon("updated_at", now)
                .with_location(trait_location.offset, trait_location.length);
            let id = annotation.id.clone();
            passage.annotations.push(annotation);
            id
        }
    };

    let entity_id = match existing_annotation_id(
        passage,
        kind.infon_type(),
        &entity_identifier,
        entity_location,
    ) {
        Some(id) => id,
        None => {
            let annotation = BiocAnnotation::new(alloc.next(kind), &entity_text)
                .with_infon("type", kind.infon_type())
                .with_infon("identifier", entity_identifier)
                .with_infon("annotator", annotator)
                .with_infon("updated_at", now)
                .with_location(entity_location.offset, entity_location.length);
            let id = annotation.id.clone();
            passage.annotations.push(annotation);
            id
        }
    };

    let relation = BiocRelation::new(alloc.next_relation())
        .with_infon("type", relation_type)
        .with_infon("annotator", annotator)
        .with_infon("updated_at", now)
        .with_node(trait_id, "")
        .with_node(entity_id, "");

    Some(relation)
}

// ============================================================================
// Externally recognized mentions
// ============================================================================

/// A mention produced by the external NLP collaborator, with offsets
/// relative to the text it was recognized in.
#[derive(Debug, Clone)]
pub struct RecognizedEntity {
    /// Collaborator's entity label (e.g. `RSID`, `PVAL`, `GENE`, or a
    /// trait label)
    pub entity_type: String,

    /// External database identifier, unqualified
    pub id: String,

    /// Literal mention text
    pub text: String,

    /// Offset within the recognized text
    pub offset: usize,

    pub length: usize,
}

impl RecognizedEntity {
    fn kind(&self) -> EntityKind {
        if self.entity_type.contains("RSID") {
            EntityKind::Variant
        } else if self.entity_type.contains("PVAL") {
            EntityKind::Significance
        } else if self.entity_type.contains("GENE") {
            EntityKind::Gene
        } else {
            EntityKind::Trait
        }
    }
}

/// Convert recognized mentions into BioC annotations, re-basing their
/// offsets into document-absolute space and drawing ids from the same
/// per-publication counters the association path uses.
pub fn ingest_recognized(
    entities: &[RecognizedEntity],
    base_offset: usize,
    alloc: &mut IdAllocator,
    annotator: &str,
    now: &str,
) -> Vec<BiocAnnotation> {
    entities
        .iter()
        .map(|entity| {
            let kind = entity.kind();
            let identifier = match kind {
                EntityKind::Trait => format!("MeSH:{}", entity.id),
                // rsids identify themselves; the external id column is
                // unused for variants
                EntityKind::Variant => format!("dbSNP:{}", entity.text),
                EntityKind::Gene => format!("Entrez:{}", entity.id),
                EntityKind::Significance => entity.id.clone(),
            };
            BiocAnnotation::new(alloc.next(kind), &entity.text)
                .with_infon("type", kind.infon_type())
                .with_infon("identifier", identifier)
                .with_infon("annotator", annotator)
                .with_infon("updated_at", now)
                .with_location(base_offset + entity.offset, entity.length)
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
