//! Embedding providers
//!
//! The graph engine consumes embeddings through [`EmbeddingProvider`]; real
//! model backends live outside this crate. [`HashingEmbedder`] produces
//! stable, deterministic vectors without external dependencies, which keeps
//! the CLI and tests self-contained.

use std::sync::Arc;

use crate::config::EmbeddingConfig;
use crate::error::{EmbeddingError, Result};

/// Trait for embedding providers
///
/// `generate` must return exactly `dimension()` floats for every input and
/// must return the same vector for identical input.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text
    fn generate(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError>;

    /// Length of every vector this provider returns
    fn dimension(&self) -> usize;

    /// Model identifier, used in reports and error messages
    fn model(&self) -> &str;
}

/// Call the provider and reject vectors of the wrong length.
pub fn embed_checked(
    provider: &dyn EmbeddingProvider,
    text: &str,
) -> std::result::Result<Vec<f32>, EmbeddingError> {
    let vector = provider.generate(text)?;
    if vector.len() != provider.dimension() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: provider.dimension(),
            actual: vector.len(),
        });
    }
    Ok(vector)
}

/// Simple vectorizer that buckets UTF-8 bytes into a fixed number of
/// dimensions and L2-normalizes the result.
#[derive(Clone, Debug)]
pub struct HashingEmbedder {
    model: String,
    dimensions: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new("hashing-64", 64)
    }
}

impl HashingEmbedder {
    pub fn new(model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            model: model.into(),
            dimensions: dimensions.max(1),
        }
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn generate(&self, text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
        if text.is_empty() {
            return Err(EmbeddingError::failed(&self.model, "no text provided for embedding"));
        }
        Ok(text_to_vec(text, self.dimensions))
    }

    fn dimension(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn text_to_vec(text: &str, dims: usize) -> Vec<f32> {
    let mut vec = vec![0.0; dims];
    for (i, b) in text.bytes().enumerate() {
        let idx = (i.wrapping_mul(31) ^ b as usize) % dims;
        vec[idx] += (b as f32) / 255.0;
    }

    // Normalize
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut vec {
            *v /= norm;
        }
    }
    vec
}

/// Build the provider named in configuration.
///
/// Returns `Ok(None)` for `"none"`; mementos are then stored without
/// embeddings and similarity search reports an empty corpus.
pub fn create_provider(config: &EmbeddingConfig) -> Result<Option<Arc<dyn EmbeddingProvider>>> {
    match config.provider.as_str() {
        "hashing" => Ok(Some(Arc::new(HashingEmbedder::new(
            config.model.clone(),
            config.dimension,
        )))),
        "none" => Ok(None),
        other => Err(EmbeddingError::UnsupportedProvider(other.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct ShortProvider;

    impl EmbeddingProvider for ShortProvider {
        fn generate(&self, _text: &str) -> std::result::Result<Vec<f32>, EmbeddingError> {
            Ok(vec![1.0, 0.0])
        }

        fn dimension(&self) -> usize {
            4
        }

        fn model(&self) -> &str {
            "short"
        }
    }

    #[test]
    fn test_hashing_embedder_is_deterministic() {
        let embedder = HashingEmbedder::default();
        let a = embedder.generate("User prefers dark mode").unwrap();
        let b = embedder.generate("User prefers dark mode").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_hashing_embedder_is_normalized() {
        let embedder = HashingEmbedder::new("test", 16);
        let v = embedder.generate("knowledge graph").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashing_embedder_rejects_empty_text() {
        let embedder = HashingEmbedder::default();
        assert!(matches!(
            embedder.generate(""),
            Err(EmbeddingError::GenerationFailed { .. })
        ));
    }

    #[test]
    fn test_embed_checked_rejects_wrong_length() {
        let err = embed_checked(&ShortProvider, "anything").unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch {
                expected: 4,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_create_provider_variants() {
        let mut config = EmbeddingConfig::default();
        config.provider = "hashing".into();
        config.dimension = 32;
        let provider = create_provider(&config).unwrap().unwrap();
        assert_eq!(provider.dimension(), 32);

        config.provider = "none".into();
        assert!(create_provider(&config).unwrap().is_none());

        config.provider = "sentence-transformers".into();
        let err = create_provider(&config).err().unwrap();
        assert!(matches!(
            err,
            Error::Embedding(EmbeddingError::UnsupportedProvider(_))
        ));
    }
}
