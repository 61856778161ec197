//! BioC document model
//!
//! In-memory representation of a publication as exchanged with the
//! external loader and serializer: a collection of documents, each made
//! of passages carrying sentences, annotations, and relations. Field
//! names match the BioC JSON exchange format exactly.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{GvaError, Result};

// ============================================================================
// Model Types
// ============================================================================

/// Top-level BioC collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiocCollection {
    /// Source name (e.g. the producing tool)
    #[serde(default)]
    pub source: String,

    /// Creation date of the collection
    #[serde(default)]
    pub date: String,

    /// Schema key
    #[serde(default)]
    pub key: String,

    /// Free-form key-value metadata
    #[serde(default)]
    pub infons: HashMap<String, String>,

    /// Documents in order
    #[serde(default)]
    pub documents: Vec<BiocDocument>,
}

/// A single publication
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiocDocument {
    /// Publication identifier
    pub id: String,

    #[serde(default)]
    pub infons: HashMap<String, String>,

    /// Passages in reading order
    #[serde(default)]
    pub passages: Vec<BiocPassage>,

    /// Document-level relations; nodes may reference annotations in any
    /// passage of this document
    #[serde(default)]
    pub relations: Vec<BiocRelation>,
}

/// A contiguous span of document text (title, paragraph, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiocPassage {
    /// Metadata; carries `section_type` (e.g. ABSTRACT) and `type`
    /// (e.g. title, paragraph)
    #[serde(default)]
    pub infons: HashMap<String, String>,

    /// Absolute character offset of this passage's text within the document
    pub offset: usize,

    #[serde(default)]
    pub text: String,

    /// Materialized sentence segmentation, when present
    #[serde(default)]
    pub sentences: Vec<BiocSentence>,

    #[serde(default)]
    pub annotations: Vec<BiocAnnotation>,

    /// Relations scoped to this passage
    #[serde(default)]
    pub relations: Vec<BiocRelation>,
}

/// A sentence nested under a passage; same annotation/relation
/// containers as a passage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiocSentence {
    #[serde(default)]
    pub infons: HashMap<String, String>,

    pub offset: usize,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub annotations: Vec<BiocAnnotation>,

    #[serde(default)]
    pub relations: Vec<BiocRelation>,
}

/// A single annotated mention
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiocAnnotation {
    /// Kind-prefixed identifier, e.g. `T0`, `V3`, `G1`, `P2`
    pub id: String,

    /// Carries `type`, database-qualified `identifier`, `annotator`,
    /// and `updated_at`
    #[serde(default)]
    pub infons: HashMap<String, String>,

    /// One or more locations in document-absolute offset space
    #[serde(default)]
    pub locations: Vec<BiocLocation>,

    /// Literal annotated text
    #[serde(default)]
    pub text: String,
}

/// Span of an annotation, in the same coordinate space as the
/// enclosing passage's text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiocLocation {
    pub offset: usize,
    pub length: usize,
}

/// A typed edge between annotations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BiocRelation {
    /// Identifier of the form `R<n>`
    pub id: String,

    /// Carries `type` (Gene_Trait or GeneticVariant_Trait), `annotator`,
    /// `updated_at`
    #[serde(default)]
    pub infons: HashMap<String, String>,

    /// Ordered endpoints
    #[serde(default)]
    pub nodes: Vec<BiocNode>,
}

/// Endpoint of a relation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiocNode {
    /// Annotation identifier this node points at
    pub refid: String,

    /// Free-text role, may be empty
    #[serde(default)]
    pub role: String,
}

// ============================================================================
// Constructors
// ============================================================================

impl BiocAnnotation {
    /// Create a new annotation with the given id and literal text
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            infons: HashMap::new(),
            locations: Vec::new(),
            text: text.into(),
        }
    }

    /// Attach an infon
    pub fn with_infon(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.infons.insert(key.into(), value.into());
        self
    }

    /// Attach a location
    pub fn with_location(mut self, offset: usize, length: usize) -> Self {
        self.locations.push(BiocLocation { offset, length });
        self
    }
}

impl BiocRelation {
    /// Create a new relation with the given id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            infons: HashMap::new(),
            nodes: Vec::new(),
        }
    }

    /// Attach an infon
    pub fn with_infon(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.infons.insert(key.into(), value.into());
        self
    }

    /// Attach a node pointing at an annotation id
    pub fn with_node(mut self, refid: impl Into<String>, role: impl Into<String>) -> Self {
        self.nodes.push(BiocNode {
            refid: refid.into(),
            role: role.into(),
        });
        self
    }

    /// The relation `type` infon, if present
    pub fn relation_type(&self) -> Option<&str> {
        self.infons.get("type").map(String::as_str)
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl BiocPassage {
    /// Look up an infon value by key
    pub fn infon(&self, key: &str) -> Option<&str> {
        self.infons.get(key).map(String::as_str)
    }
}

impl BiocDocument {
    /// The PubMed identifier, read from the `article-id_pmid` infon of
    /// the first passage
    pub fn pmid(&self) -> Option<&str> {
        self.passages.first().and_then(|p| p.infon("article-id_pmid"))
    }

    /// All annotation identifiers across passages and their sentences
    pub fn annotation_ids(&self) -> HashSet<&str> {
        let mut ids = HashSet::new();
        for passage in &self.passages {
            for annotation in &passage.annotations {
                ids.insert(annotation.id.as_str());
            }
            for sentence in &passage.sentences {
                for annotation in &sentence.annotations {
                    ids.insert(annotation.id.as_str());
                }
            }
        }
        ids
    }

    /// Check that every relation node, document- and passage-level,
    /// references an annotation that exists in this document.
    pub fn validate_relations(&self) -> Result<()> {
        let ids = self.annotation_ids();
        let document_relations = self.relations.iter();
        let passage_relations = self.passages.iter().flat_map(|p| p.relations.iter());
        for relation in document_relations.chain(passage_relations) {
            for node in &relation.nodes {
                if !ids.contains(node.refid.as_str()) {
                    return Err(GvaError::DanglingNode {
                        relation: relation.id.clone(),
                        refid: node.refid.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
