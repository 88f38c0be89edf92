use std::collections::HashMap;
use std::sync::Arc;

use docrag_core::config::RetrievalConfig;
use docrag_core::error::{DocragError, Result};
use docrag_core::models::{BlockId, ChatMessage, TextChunk};
use docrag_core::ports::{Embedder, Generator};
use docrag_core::processing::Expander;
use docrag_index::{SearchHit, VectorIndex};
use tokio::sync::RwLock;

use crate::models::{RagAnswer, SourceReference};
use crate::prompt;

/// Maximum snippet length in a source reference.
const SNIPPET_MAX_CHARS: usize = 240;

/// Retrieval pipeline: embed, search, expand, assemble, generate.
///
/// The index is shared behind a read/write lock; searches take a read
/// lock while ingestion holds the write side, so readers never observe
/// a half-appended index.
pub struct RagPipeline {
    index: Arc<RwLock<VectorIndex>>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    config: RetrievalConfig,
}

impl RagPipeline {
    /// Create a new retrieval pipeline.
    pub fn new(
        index: Arc<RwLock<VectorIndex>>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        config: RetrievalConfig,
    ) -> Self {
        Self { index, embedder, generator, config }
    }

    /// Answer a question against the indexed corpus.
    ///
    /// `top_k` overrides the configured default when given. An empty
    /// index produces an empty context; the grounding instruction then
    /// forces a refusal from the model.
    pub async fn answer(&self, question: &str, top_k: Option<usize>) -> Result<RagAnswer> {
        let top_k = top_k.unwrap_or(self.config.top_k);

        let query = {
            let vectors = self.embedder.embed(&[question]).await?;
            vectors.into_iter().next().ok_or_else(|| DocragError::EmbedderUnavailable {
                reason: "embedder returned no vector for the query".to_string(),
                remediation: "check the embedding model configuration".to_string(),
            })?
        };

        let expander = Expander::new(self.config.neighbor_window);

        // Search and context assembly run under the read lock;
        // generation happens after it is released.
        let (context, sources) = {
            let index = self.index.read().await;
            let hits = index.search(&query, top_k)?;
            assemble_context(&hits, index.chunks(), &expander)
        };

        tracing::debug!(question, sources = sources.len(), "assembled retrieval context");

        let messages = [
            ChatMessage::system(prompt::grounding_instruction()),
            ChatMessage::user(prompt::user_message(question, &context)),
        ];

        let answer = self.generator.chat(&messages).await?;

        Ok(RagAnswer { answer, sources })
    }
}

/// Expand each hit, deduplicate parent blocks, and join the distinct
/// context blocks in retrieval rank order.
fn assemble_context(
    hits: &[SearchHit],
    corpus: &[TextChunk],
    expander: &Expander,
) -> (String, Vec<SourceReference>) {
    let mut blocks: Vec<String> = Vec::new();
    let mut assembled: HashMap<(String, BlockId), String> = HashMap::new();
    let mut sources = Vec::with_capacity(hits.len());

    for (rank, hit) in hits.iter().enumerate() {
        let parent_key = (hit.chunk.document_id.clone(), hit.chunk.parent_block);

        // A parent block expanded once appears once, no matter how many
        // of its windows were retrieved.
        if !assembled.contains_key(&parent_key) {
            let expanded = expander.expand(&hit.chunk, corpus);
            let joined = expanded
                .iter()
                .map(|c| c.content.as_str())
                .collect::<Vec<_>>()
                .join("\n");

            blocks.push(format!(
                "{}\n{}",
                prompt::source_header(hit.score, &hit.chunk.document_id, &hit.chunk.id),
                joined
            ));
            assembled.insert(parent_key, joined);
        }

        sources.push(SourceReference {
            rank: rank + 1,
            score: hit.score,
            document_id: hit.chunk.document_id.clone(),
            chunk_id: hit.chunk.id.clone(),
            page_id: hit.chunk.page_id,
            snippet: snippet(&hit.chunk.content),
            split: hit.chunk.split,
        });
    }

    (blocks.join(prompt::CONTEXT_SEPARATOR), sources)
}

fn snippet(content: &str) -> String {
    if content.len() <= SNIPPET_MAX_CHARS {
        return content.to_string();
    }

    let mut end = SNIPPET_MAX_CHARS;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &content[..end])
}
