//! Kind-prefixed annotation ID allocation
//!
//! Annotation identifiers are prefixed by entity kind (`T`, `V`, `G`,
//! `P`) and drawn from independent monotone counters. One allocator is
//! scoped to one publication's processing run; counters are shared
//! across all passages of that publication and never reused afterward.

use serde::{Deserialize, Serialize};

// ============================================================================
// Entity Kinds
// ============================================================================

/// Annotation kinds produced by the alignment engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Trait/disease mention
    Trait,
    /// Genetic variant (dbSNP rsid)
    Variant,
    /// Gene mention
    Gene,
    /// Significance value (p-value)
    Significance,
}

impl EntityKind {
    /// Identifier prefix for this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Trait => "T",
            Self::Variant => "V",
            Self::Gene => "G",
            Self::Significance => "P",
        }
    }

    /// Value of the `type` infon for annotations of this kind
    pub fn infon_type(&self) -> &'static str {
        match self {
            Self::Trait => "trait",
            Self::Variant => "genetic_variant",
            Self::Gene => "gene",
            Self::Significance => "significance",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.infon_type())
    }
}

// ============================================================================
// Allocator
// ============================================================================

/// Per-publication ID allocator: four independent annotation counters
/// plus a relation counter, each strictly increasing from zero.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    traits: usize,
    variants: usize,
    genes: usize,
    significances: usize,
    relations: usize,
}

impl IdAllocator {
    /// Create a fresh allocator with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier for the given kind
    pub fn next(&mut self, kind: EntityKind) -> String {
        let counter = self.counter_mut(kind);
        let id = format!("{}{}", kind.prefix(), *counter);
        *counter += 1;
        id
    }

    /// Allocate the next relation identifier (`R<n>`)
    pub fn next_relation(&mut self) -> String {
        let id = format!("R{}", self.relations);
        self.relations += 1;
        id
    }

    /// The value the next allocation of this kind will use
    pub fn peek(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Trait => self.traits,
            EntityKind::Variant => self.variants,
            EntityKind::Gene => self.genes,
            EntityKind::Significance => self.significances,
        }
    }

    fn counter_mut(&mut self, kind: EntityKind) -> &mut usize {
        match kind {
            EntityKind::Trait => &mut self.traits,
            EntityKind::Variant => &mut self.variants,
            EntityKind::Gene => &mut self.genes,
            EntityKind::Significance => &mut self.significances,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
