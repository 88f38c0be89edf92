use chrono::{DateTime, Utc};
use docrag_core::config::ChunkingConfig;
use docrag_core::models::PageLayout;
use serde::{Deserialize, Serialize};

/// Query request body
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,

    /// Overrides the server's default when given
    pub top_k: Option<usize>,
}

/// Ingest request body: a document's extracted page layouts plus
/// optional chunking overrides.
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    /// Filename-derived document id; one is generated when absent
    pub document_id: Option<String>,

    /// Page layouts from the external extraction collaborator
    pub pages: Vec<PageLayout>,

    /// Per-request chunking parameters; the server defaults apply when
    /// omitted
    pub chunking: Option<ChunkingConfig>,
}

/// Ingest operation response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub document_id: String,
    pub chunk_count: usize,
    pub index_size: usize,
    pub message: String,
}

impl IngestResponse {
    pub fn success(document_id: String, chunk_count: usize, index_size: usize) -> Self {
        let message = format!("Successfully ingested {document_id} with {chunk_count} chunks");
        Self { success: true, document_id, chunk_count, index_size, message }
    }
}

/// Index status response
#[derive(Debug, Serialize)]
pub struct IndexStatusResponse {
    pub chunk_count: usize,
    pub embedding_dim: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub embedder: String,
}

/// Clear operation response
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "docrag-api" }
    }
}
