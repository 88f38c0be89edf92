use serde::{Deserialize, Serialize};

/// A grounded answer with its source citations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagAnswer {
    /// Raw text returned by the generation capability
    pub answer: String,

    /// Source references in retrieval rank order
    pub sources: Vec<SourceReference>,
}

/// Reference to a retrieved chunk that contributed context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceReference {
    /// 1-based retrieval rank
    pub rank: usize,

    /// Cosine similarity of the originating hit
    pub score: f32,

    pub document_id: String,

    pub chunk_id: String,

    /// 1-based page number
    pub page_id: u32,

    /// Shortened chunk content for display
    pub snippet: String,

    /// Whether the originating hit was a windowed child chunk
    pub split: bool,
}
