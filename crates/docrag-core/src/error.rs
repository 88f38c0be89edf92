//! Error types for docrag

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocragError {
    // Input errors
    #[error("Cannot build an index from an empty chunk list")]
    EmptyInput,

    #[error("Embedding dimension mismatch: index holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Capability errors
    #[error("Embedder unavailable: {reason}. Try: {remediation}")]
    EmbedderUnavailable { reason: String, remediation: String },

    #[error("Embedding request timed out after {seconds}s")]
    EmbeddingTimeout { seconds: u64 },

    #[error("Generator unavailable: {reason}. Try: {remediation}")]
    GeneratorUnavailable { reason: String, remediation: String },

    #[error("Generation request timed out after {seconds}s")]
    GenerationTimeout { seconds: u64 },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DocragError>;
