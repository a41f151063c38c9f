//! Mementos: atomic, immutable text observations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::MementoId;

/// A raw observation, the base layer of the graph
///
/// Created once by [`GraphStore::add_memento`](super::GraphStore::add_memento)
/// and never mutated. The embedding is computed at creation time when the
/// store has a provider, otherwise it stays `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memento {
    /// Sequential identifier (`m<N>`)
    pub id: MementoId,
    /// The observation text, never empty
    pub content: String,
    /// When the memento was recorded
    pub timestamp: DateTime<Utc>,
    /// Embedding vector, present only when a provider was configured
    pub embedding: Option<Vec<f32>>,
    /// Free-form provenance label (e.g. "conversation")
    pub source: Option<String>,
}

impl Memento {
    /// Length of the embedding, if one was computed
    pub fn embedding_dimension(&self) -> Option<usize> {
        self.embedding.as_ref().map(Vec::len)
    }

    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}
