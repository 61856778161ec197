//! GVA Core - BioC document model and shared types
//!
//! This crate defines the core abstractions used throughout the GVA system:
//! - BioC document model (collection, document, passage, annotation, relation)
//! - Kind-prefixed annotation ID allocation
//! - Common error types
//! - Configuration management

pub mod bioc;
pub mod config;
pub mod ids;

pub use bioc::{
    BiocAnnotation, BiocCollection, BiocDocument, BiocLocation, BiocNode, BiocPassage,
    BiocRelation, BiocSentence,
};
pub use config::{AppConfig, ConfigError, LoggingConfig};
pub use ids::{EntityKind, IdAllocator};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for GVA operations
#[derive(Error, Debug)]
pub enum GvaError {
    /// The document model violates a structural requirement. Hard failure
    /// for the affected publication; other publications are unaffected.
    #[error("Structural error in document model: {0}")]
    Structural(String),

    #[error("Relation {relation} references unknown annotation: {refid}")]
    DanglingNode { relation: String, refid: String },

    #[error("I/O error on {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GvaError>;
