//! Capability port definitions
//!
//! These traits define the interfaces that embedding and generation
//! adapters must implement. The core never talks to a model server
//! directly.

use crate::error::Result;
use crate::models::ChatMessage;
use async_trait::async_trait;

/// Port for embedding text into vector representations.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for a batch of texts.
    ///
    /// Returns one vector per input text, in input order. An empty
    /// input yields an empty result.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Dimensionality of embeddings produced by this embedder
    fn dimensions(&self) -> usize;

    /// Name/identifier of the embedding model
    fn model_name(&self) -> &str;
}

/// Port for chat-style text generation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for an ordered message exchange.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Name/identifier of the generation model
    fn model_name(&self) -> &str;
}
