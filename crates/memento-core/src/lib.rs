//! Memento Core Library
//!
//! This crate provides the knowledge graph engine behind Memento, including:
//! - Graph store (mementos, entities, relationships, hierarchy)
//! - Embedding providers and semantic similarity search
//! - Renderers (layered report, JSON export, Mermaid, Cypher)
//! - Export restore
//! - Configuration

pub mod config;
pub mod embedding;
pub mod error;
pub mod graph;
pub mod search;
pub mod visualization;


pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::embedding::{EmbeddingProvider, HashingEmbedder, create_provider};
    pub use crate::error::{Error, Result};
    pub use crate::graph::{
        Entity, EntityDraft, EntityId, EntityType, GraphStore, HierarchyEdge, Memento, MementoId,
        Properties, PropertyValue, RelationType, Relationship, RelationshipDraft, Scale,
        SharedGraphStore,
    };
    pub use crate::search::{SearchHit, SimilaritySearch, cosine_similarity};
    pub use crate::visualization::{
        GraphExport, GraphStatistics, OutputFormat, ReportOptions, parse_export, render,
        render_cypher, render_export, render_mermaid, render_report,
    };
}
