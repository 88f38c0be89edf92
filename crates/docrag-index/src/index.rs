use chrono::{DateTime, Utc};
use docrag_core::error::{DocragError, Result};
use docrag_core::models::TextChunk;
use docrag_core::ports::Embedder;
use serde::Serialize;

use crate::normalize::l2_normalize;

/// Texts embedded per capability call.
const EMBED_BATCH_SIZE: usize = 32;

/// One search result: a cosine-similarity score and the matching chunk.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Inner product of two unit vectors, range [-1, 1]
    pub score: f32,

    pub chunk: TextChunk,
}

/// Snapshot of the index state.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub chunk_count: usize,
    pub embedding_dim: usize,
    pub built_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Flat exact inner-product index with a row-aligned metadata table.
///
/// Vectors are stored row-major and L2-normalized at insert time, so an
/// inner product against a normalized query is cosine similarity. Row
/// `i` of the vector storage and `metadata[i]` describe the same chunk;
/// keeping the two positionally aligned across appends is the central
/// invariant of this type, which is why vectors and metadata are only
/// ever mutated together.
#[derive(Debug, Default)]
pub struct VectorIndex {
    dim: usize,
    data: Vec<f32>,
    metadata: Vec<TextChunk>,
    built_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl VectorIndex {
    /// Create an empty index. The dimensionality is established by the
    /// first append.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a chunk list.
    ///
    /// Fails with `EmptyInput` if `chunks` is empty.
    pub async fn build(chunks: &[TextChunk], embedder: &dyn Embedder) -> Result<Self> {
        if chunks.is_empty() {
            return Err(DocragError::EmptyInput);
        }

        let mut index = Self::new();
        index.append(chunks, embedder).await?;
        index.built_at = Some(Utc::now());

        tracing::info!(
            chunks = index.metadata.len(),
            dim = index.dim,
            model = embedder.model_name(),
            "built vector index"
        );

        Ok(index)
    }

    /// Append new chunks to the index. No-op on an empty chunk list.
    ///
    /// Fails with `DimensionMismatch` if the embeddings differ in
    /// dimensionality from the vectors already held; the index is left
    /// unchanged in that case.
    pub async fn add(&mut self, chunks: &[TextChunk], embedder: &dyn Embedder) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        self.append(chunks, embedder).await?;

        let now = Utc::now();
        if self.built_at.is_none() {
            self.built_at = Some(now);
        }
        self.updated_at = Some(now);

        tracing::info!(added = chunks.len(), total = self.metadata.len(), "appended to index");

        Ok(())
    }

    /// Embed and stage all vectors first; the live storage is only
    /// touched once every vector has been validated, so a failed append
    /// cannot leave vectors and metadata misaligned.
    async fn append(&mut self, chunks: &[TextChunk], embedder: &dyn Embedder) -> Result<()> {
        let mut staged: Vec<Vec<f32>> = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let vectors = embedder.embed(&texts).await?;

            if vectors.len() != texts.len() {
                return Err(DocragError::EmbedderUnavailable {
                    reason: format!(
                        "embedder returned {} vectors for {} inputs",
                        vectors.len(),
                        texts.len()
                    ),
                    remediation: "check the embedding model configuration".to_string(),
                });
            }

            staged.extend(vectors);
        }

        let new_dim = staged[0].len();
        if new_dim == 0 {
            return Err(DocragError::EmbedderUnavailable {
                reason: "embedder returned zero-dimensional vectors".to_string(),
                remediation: "check the embedding model configuration".to_string(),
            });
        }

        let expected = if self.metadata.is_empty() { new_dim } else { self.dim };
        for vector in &staged {
            if vector.len() != expected {
                return Err(DocragError::DimensionMismatch {
                    expected,
                    actual: vector.len(),
                });
            }
        }

        self.dim = expected;
        for mut vector in staged {
            l2_normalize(&mut vector);
            self.data.extend_from_slice(&vector);
        }
        self.metadata.extend_from_slice(chunks);

        debug_assert_eq!(self.data.len(), self.metadata.len() * self.dim);

        Ok(())
    }

    /// Search for the `top_k` most similar chunks.
    ///
    /// The query is normalized here; callers never need to pre-normalize.
    /// Returns an empty result on an empty index and fails with
    /// `DimensionMismatch` on a wrong-length query.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchHit>> {
        if self.metadata.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != self.dim {
            return Err(DocragError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }

        let mut normalized = query.to_vec();
        l2_normalize(&mut normalized);

        let mut scored: Vec<(f32, usize)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(row, vector)| {
                let score = vector.iter().zip(&normalized).map(|(a, b)| a * b).sum::<f32>();
                (score, row)
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);

        Ok(scored
            .into_iter()
            .map(|(score, row)| SearchHit { score, chunk: self.metadata[row].clone() })
            .collect())
    }

    /// Convenience composition: embed the query text, then search.
    pub async fn search_by_text(
        &self,
        query: &str,
        embedder: &dyn Embedder,
        top_k: usize,
    ) -> Result<Vec<SearchHit>> {
        let vectors = embedder.embed(&[query]).await?;
        let query_vector = vectors.into_iter().next().ok_or_else(|| {
            DocragError::EmbedderUnavailable {
                reason: "embedder returned no vector for the query".to_string(),
                remediation: "check the embedding model configuration".to_string(),
            }
        })?;

        self.search(&query_vector, top_k)
    }

    /// Reset to zero vectors and empty metadata.
    pub fn clear(&mut self) {
        self.dim = 0;
        self.data.clear();
        self.metadata.clear();
        self.built_at = None;
        self.updated_at = None;
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Dimensionality of the stored vectors; zero while the index is
    /// empty.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The metadata table in row order. This is also the ordered corpus
    /// sequence that context expansion walks.
    pub fn chunks(&self) -> &[TextChunk] {
        &self.metadata
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            chunk_count: self.metadata.len(),
            embedding_dim: self.dim,
            built_at: self.built_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docrag_core::models::BlockId;

    /// Deterministic word-hash embedder; identical texts embed to
    /// identical vectors.
    struct StubEmbedder {
        dim: usize,
    }

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|text| {
                    let mut vector = vec![0.0f32; self.dim];
                    for word in text.split_whitespace() {
                        let h = word
                            .bytes()
                            .fold(7usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
                        vector[h % self.dim] += 1.0;
                    }
                    vector
                })
                .collect())
        }

        fn dimensions(&self) -> usize {
            self.dim
        }

        fn model_name(&self) -> &str {
            "stub-embedder"
        }
    }

    fn chunk(id: &str, index: usize, content: &str) -> TextChunk {
        TextChunk {
            id: id.to_string(),
            document_id: "doc".to_string(),
            page_id: 1,
            parent_block: BlockId::new(1, index as u32),
            chunk_index: index,
            content: content.to_string(),
            split: false,
            wordcount: content.split_whitespace().count(),
        }
    }

    fn sample_chunks() -> Vec<TextChunk> {
        vec![
            chunk("doc-p1-b0", 0, "peanut allergies in young children"),
            chunk("doc-p1-b1", 1, "grilling vegetables over charcoal"),
            chunk("doc-p1-b2", 2, "symptoms of an allergic reaction"),
        ]
    }

    #[tokio::test]
    async fn test_build_from_empty_chunks_fails() {
        let embedder = StubEmbedder { dim: 16 };
        let result = VectorIndex::build(&[], &embedder).await;
        assert!(matches!(result, Err(DocragError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_build_aligns_vectors_and_metadata() {
        let embedder = StubEmbedder { dim: 16 };
        let index = VectorIndex::build(&sample_chunks(), &embedder).await.unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.dim(), 16);
        assert_eq!(index.data.len(), index.len() * index.dim());
        for (i, meta) in index.chunks().iter().enumerate() {
            assert_eq!(meta.chunk_index, i);
        }
        assert!(index.stats().built_at.is_some());
    }

    #[tokio::test]
    async fn test_add_appends_in_order() {
        let embedder = StubEmbedder { dim: 16 };
        let mut index = VectorIndex::build(&sample_chunks(), &embedder).await.unwrap();

        let extra = vec![chunk("doc-p2-b0", 3, "a later addition about pollen")];
        index.add(&extra, &embedder).await.unwrap();

        assert_eq!(index.len(), 4);
        assert_eq!(index.chunks()[3].id, "doc-p2-b0");
        assert_eq!(index.data.len(), 4 * 16);
        assert!(index.stats().updated_at.is_some());
    }

    #[tokio::test]
    async fn test_add_empty_is_noop() {
        let embedder = StubEmbedder { dim: 16 };
        let mut index = VectorIndex::build(&sample_chunks(), &embedder).await.unwrap();
        let stats_before = index.stats();

        index.add(&[], &embedder).await.unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(index.stats().updated_at, stats_before.updated_at);
    }

    #[tokio::test]
    async fn test_add_dimension_mismatch_leaves_index_unchanged() {
        let embedder_384 = StubEmbedder { dim: 384 };
        let mut index = VectorIndex::build(&sample_chunks(), &embedder_384).await.unwrap();

        let embedder_768 = StubEmbedder { dim: 768 };
        let extra = vec![chunk("doc-p2-b0", 3, "wrong dimensionality")];
        let result = index.add(&extra, &embedder_768).await;

        assert!(matches!(
            result,
            Err(DocragError::DimensionMismatch { expected: 384, actual: 768 })
        ));
        assert_eq!(index.len(), 3);
        assert_eq!(index.dim(), 384);
        assert_eq!(index.data.len(), 3 * 384);
    }

    #[tokio::test]
    async fn test_search_empty_index_returns_nothing() {
        let index = VectorIndex::new();
        let hits = index.search(&[1.0, 0.0], 5).unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_search_self_embedding_ranks_first() {
        let embedder = StubEmbedder { dim: 64 };
        let chunks = sample_chunks();
        let index = VectorIndex::build(&chunks, &embedder).await.unwrap();

        let query = embedder.embed(&[chunks[1].content.as_str()]).await.unwrap().remove(0);
        let hits = index.search(&query, 3).unwrap();

        assert_eq!(hits[0].chunk.id, chunks[1].id);
        assert!((hits[0].score - 1.0).abs() < 1e-5);
        // Descending order.
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_search_unnormalized_query_scores_like_normalized() {
        let embedder = StubEmbedder { dim: 64 };
        let chunks = sample_chunks();
        let index = VectorIndex::build(&chunks, &embedder).await.unwrap();

        let query = embedder.embed(&[chunks[0].content.as_str()]).await.unwrap().remove(0);
        let scaled: Vec<f32> = query.iter().map(|x| x * 37.5).collect();

        let a = index.search(&query, 3).unwrap();
        let b = index.search(&scaled, 3).unwrap();

        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.chunk.id, y.chunk.id);
            assert!((x.score - y.score).abs() < 1e-5);
        }
    }

    #[tokio::test]
    async fn test_search_wrong_query_dimension_fails() {
        let embedder = StubEmbedder { dim: 16 };
        let index = VectorIndex::build(&sample_chunks(), &embedder).await.unwrap();

        let result = index.search(&[1.0, 0.0], 3);
        assert!(matches!(result, Err(DocragError::DimensionMismatch { expected: 16, actual: 2 })));
    }

    #[tokio::test]
    async fn test_search_top_k_larger_than_index() {
        let embedder = StubEmbedder { dim: 16 };
        let index = VectorIndex::build(&sample_chunks(), &embedder).await.unwrap();

        let query = embedder.embed(&["anything"]).await.unwrap().remove(0);
        let hits = index.search(&query, 50).unwrap();

        assert_eq!(hits.len(), 3);
    }

    #[tokio::test]
    async fn test_search_by_text() {
        let embedder = StubEmbedder { dim: 64 };
        let chunks = sample_chunks();
        let index = VectorIndex::build(&chunks, &embedder).await.unwrap();

        let hits = index
            .search_by_text("peanut allergies in young children", &embedder, 1)
            .await
            .unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chunk.id, "doc-p1-b0");
    }

    #[tokio::test]
    async fn test_clear_resets_everything() {
        let embedder = StubEmbedder { dim: 16 };
        let mut index = VectorIndex::build(&sample_chunks(), &embedder).await.unwrap();

        index.clear();

        assert!(index.is_empty());
        assert_eq!(index.dim(), 0);
        assert!(index.stats().built_at.is_none());
        assert!(index.search(&[1.0; 16], 3).unwrap().is_empty());

        // A fresh dimensionality can be established after a clear.
        let embedder_8 = StubEmbedder { dim: 8 };
        index.add(&sample_chunks(), &embedder_8).await.unwrap();
        assert_eq!(index.dim(), 8);
    }
}
