use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use docrag_core::error::DocragError;
use docrag_core::processing::Chunker;
use docrag_retrieval::{RagAnswer, RagPipeline};
use uuid::Uuid;

use crate::dto::{
    ClearResponse, HealthResponse, IndexStatusResponse, IngestRequest, IngestResponse,
    QueryRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/query", post(handle_query))
        .route("/api/v1/ingest", post(handle_ingest))
        .route("/api/v1/index/status", get(index_status))
        .route("/api/v1/index/clear", post(clear_index))
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

async fn handle_query(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<RagAnswer>, ApiError> {
    tracing::info!(
        question = %request.question,
        top_k = request.top_k,
        "Processing query request"
    );

    let pipeline = RagPipeline::new(
        state.index.clone(),
        state.embedder.clone(),
        state.generator.clone(),
        state.retrieval,
    );

    let result = pipeline.answer(&request.question, request.top_k).await.map_err(|e| {
        tracing::error!(error = %e, "Query execution failed");
        ApiError::from(e)
    })?;

    Ok(Json(result))
}

async fn handle_ingest(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    let document_id = request
        .document_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("upload-{}", Uuid::new_v4()));

    tracing::info!(
        document_id = %document_id,
        pages = request.pages.len(),
        "Processing ingest request"
    );

    let chunking = request.chunking.unwrap_or(state.chunking);
    let chunker = Chunker::new(chunking)?;
    let chunks = chunker.chunk(&document_id, &request.pages);

    if chunks.is_empty() {
        return Err(ApiError::from(DocragError::EmptyInput)
            .with_details(format!("document '{document_id}' produced no usable chunks")));
    }

    let mut index = state.index.write().await;
    index.add(&chunks, state.embedder.as_ref()).await.map_err(|e| {
        tracing::error!(error = %e, document_id = %document_id, "Ingest failed");
        ApiError::from(e)
    })?;

    let index_size = index.len();
    tracing::info!(
        document_id = %document_id,
        chunk_count = chunks.len(),
        index_size,
        "Successfully ingested document"
    );

    Ok(Json(IngestResponse::success(document_id, chunks.len(), index_size)))
}

async fn index_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<IndexStatusResponse>, ApiError> {
    let index = state.index.read().await;
    let stats = index.stats();

    Ok(Json(IndexStatusResponse {
        chunk_count: stats.chunk_count,
        embedding_dim: stats.embedding_dim,
        built_at: stats.built_at,
        updated_at: stats.updated_at,
        embedder: state.embedder.model_name().to_string(),
    }))
}

async fn clear_index(State(state): State<Arc<AppState>>) -> Result<Json<ClearResponse>, ApiError> {
    let mut index = state.index.write().await;
    let removed = index.len();
    index.clear();

    tracing::info!(removed, "Cleared index");

    Ok(Json(ClearResponse {
        success: true,
        message: format!("Removed {removed} chunks from the index"),
    }))
}
