//! Error types for Memento

use thiserror::Error;

/// Result type alias using Memento's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Memento error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Lookup errors (E001-E099)
    #[error("Memento '{0}' not found.")]
    MementoNotFound(String),

    #[error("Entity '{0}' not found.")]
    EntityNotFound(String),

    // Referential errors (E100-E199)
    #[error("Unknown memento '{id}' referenced by {referenced_by}. Add the memento before referencing it.")]
    UnknownMemento { id: String, referenced_by: String },

    #[error("Unknown entity '{id}' referenced by {referenced_by}. Add the entity before referencing it.")]
    UnknownEntity { id: String, referenced_by: String },

    // Search errors (E200-E299)
    #[error("No memento carries an embedding. Configure an embedding provider before searching.")]
    EmptyCorpus,

    // Provider errors (E300-E399)
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    // Input errors (E400-E499)
    #[error("Relationship strength {0} is outside [0.0, 1.0].")]
    InvalidStrength(f32),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Export errors (E500-E599)
    #[error("Restore failed: {0}")]
    RestoreFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised by an embedding provider
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding failed for model {model}: {reason}")]
    GenerationFailed { model: String, reason: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Unsupported embedding provider '{0}'. Supported providers: hashing, none")]
    UnsupportedProvider(String),
}

impl EmbeddingError {
    pub fn failed(model: impl Into<String>, reason: impl Into<String>) -> Self {
        EmbeddingError::GenerationFailed {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::MementoNotFound(_) => "E001",
            Self::EntityNotFound(_) => "E002",
            Self::UnknownMemento { .. } => "E100",
            Self::UnknownEntity { .. } => "E101",
            Self::EmptyCorpus => "E200",
            Self::Embedding(_) => "E300",
            Self::InvalidStrength(_) => "E400",
            Self::InvalidInput(_) => "E401",
            Self::RestoreFailed(_) => "E500",
            Self::Serialization(_) => "E501",
            Self::ConfigError(_) => "E600",
            Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::EmptyCorpus => Some("memento config set embedding.provider hashing".to_string()),
            Self::Embedding(EmbeddingError::UnsupportedProvider(_)) => {
                Some("memento config set embedding.provider hashing".to_string())
            }
            Self::ConfigError(_) => Some("memento config list".to_string()),
            Self::InvalidStrength(_) => Some("Use a strength between 0.0 and 1.0".to_string()),
            _ => None,
        }
    }

    /// Whether this error reports a dangling reference on insertion
    pub fn is_referential(&self) -> bool {
        matches!(self, Self::UnknownMemento { .. } | Self::UnknownEntity { .. })
    }

    /// Whether this error reports a failed point lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MementoNotFound(_) | Self::EntityNotFound(_))
    }
}
