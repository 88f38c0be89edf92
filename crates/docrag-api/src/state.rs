use std::sync::Arc;

use docrag_core::config::{ChunkingConfig, RetrievalConfig};
use docrag_core::ports::{Embedder, Generator};
use docrag_index::VectorIndex;
use tokio::sync::RwLock;

/// Shared application state, constructed once at startup and handed to
/// every request handler.
///
/// The index sits behind a read/write lock: searches take the read
/// side, ingestion and clearing take the write side, so the two-step
/// vector/metadata append is never observed half-done.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<RwLock<VectorIndex>>,
    pub embedder: Arc<dyn Embedder>,
    pub generator: Arc<dyn Generator>,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
}

impl AppState {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        chunking: ChunkingConfig,
        retrieval: RetrievalConfig,
    ) -> Self {
        Self {
            index: Arc::new(RwLock::new(VectorIndex::new())),
            embedder,
            generator,
            chunking,
            retrieval,
        }
    }
}
