//! Semantic similarity search over memento embeddings
//!
//! Ranks embedded mementos by cosine similarity to a query. Mementos without
//! an embedding are skipped entirely; they are never scored as zero.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::debug;

use crate::embedding::{EmbeddingProvider, embed_checked};
use crate::error::{EmbeddingError, Error, Result};
use crate::graph::{GraphStore, Memento};

/// One ranked search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub memento: Memento,
    /// Cosine similarity, in [-1.0, 1.0]
    pub score: f32,
}

/// Similarity search bound to a store and the provider used for queries
pub struct SimilaritySearch<'a> {
    store: &'a GraphStore,
    provider: Option<&'a dyn EmbeddingProvider>,
}

impl<'a> SimilaritySearch<'a> {
    /// Search `store` using an explicit query provider
    ///
    /// The provider must produce vectors of the same length as the stored
    /// embeddings.
    pub fn new(store: &'a GraphStore, provider: &'a dyn EmbeddingProvider) -> Result<Self> {
        let stored = store
            .embedded_mementos()
            .next()
            .and_then(Memento::embedding_dimension);
        if let Some(expected) = stored {
            if provider.dimension() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: provider.dimension(),
                }
                .into());
            }
        }
        Ok(Self {
            store,
            provider: Some(provider),
        })
    }

    /// Search `store` using the store's own provider
    pub fn for_store(store: &'a GraphStore) -> Self {
        Self {
            store,
            provider: store.provider().map(|p| &**p),
        }
    }

    /// Whether a query could be answered at all
    pub fn is_available(&self) -> bool {
        self.provider.is_some() && self.store.embedded_mementos().next().is_some()
    }

    /// Return the `top_k` mementos most similar to `query`
    ///
    /// Fails with [`Error::EmptyCorpus`] when no memento is embedded, even
    /// for `top_k == 0`. Equal scores keep insertion order.
    pub fn find_similar(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        if self.store.embedded_mementos().next().is_none() {
            return Err(Error::EmptyCorpus);
        }
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let provider = self.provider.ok_or_else(|| {
            Error::ConfigError("no embedding provider is configured to embed the query".to_string())
        })?;

        let query_embedding = embed_checked(provider, query)?;

        let mut ranked: Vec<(f32, &Memento)> = self
            .store
            .embedded_mementos()
            .filter_map(|m| {
                m.embedding
                    .as_deref()
                    .map(|e| (cosine_similarity(&query_embedding, e), m))
            })
            .collect();

        // Stable: ties stay in insertion order
        ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        ranked.truncate(top_k);

        debug!(query = %query, top_k, hits = ranked.len(), "Similarity search completed");

        Ok(ranked
            .into_iter()
            .map(|(score, memento)| SearchHit {
                memento: memento.clone(),
                score,
            })
            .collect())
    }
}

impl GraphStore {
    /// Similarity search using the store's provider
    pub fn find_similar(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        SimilaritySearch::for_store(self).find_similar(query, top_k)
    }
}

/// Cosine similarity of two vectors
///
/// Returns 0.0 when the lengths differ or either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
