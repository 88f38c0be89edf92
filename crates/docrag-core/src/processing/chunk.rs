use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::models::{BlockId, PageLayout, TextChunk};

/// Splits page layouts into retrievable chunks.
///
/// Blocks that fit the target chunk size are emitted verbatim as single
/// chunks. Oversized blocks are cut into overlapping word windows whose
/// children all carry the parent block's key, so the full block can be
/// reconstructed at expansion time.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a chunker, validating the configuration before any
    /// chunking work begins.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Chunk a document's pages into a flat, ordered chunk sequence.
    ///
    /// Pages are processed in input order; callers pre-sort if page
    /// order matters. Blocks with no words are skipped. `chunk_index`
    /// increments globally for every emitted chunk.
    pub fn chunk(&self, document_id: &str, pages: &[PageLayout]) -> Vec<TextChunk> {
        let chunk_size = self.config.chunk_size;
        let threshold = self.config.oversize_threshold();
        // Positive because overlap < chunk_size is enforced at construction.
        let step = chunk_size - self.config.overlap;

        let mut chunks: Vec<TextChunk> = Vec::new();

        for page in pages {
            for (block_idx, block) in page.blocks.iter().enumerate() {
                let words: Vec<&str> = block.text.split_whitespace().collect();
                if words.is_empty() {
                    continue;
                }

                let parent = BlockId::new(page.page_number, block_idx as u32);

                if words.len() as f32 > threshold {
                    let mut start = 0usize;
                    let mut sub = 0u32;
                    while start < words.len() {
                        let end = (start + chunk_size).min(words.len());
                        let window = &words[start..end];
                        chunks.push(TextChunk {
                            id: format!("{document_id}-{parent}-s{sub}"),
                            document_id: document_id.to_string(),
                            page_id: page.page_number,
                            parent_block: parent,
                            chunk_index: chunks.len(),
                            content: window.join(" "),
                            split: true,
                            wordcount: window.len(),
                        });
                        start += step;
                        sub += 1;
                    }
                } else {
                    chunks.push(TextChunk {
                        id: format!("{document_id}-{parent}"),
                        document_id: document_id.to_string(),
                        page_id: page.page_number,
                        parent_block: parent,
                        chunk_index: chunks.len(),
                        content: words.join(" "),
                        split: false,
                        wordcount: words.len(),
                    });
                }
            }
        }

        tracing::debug!(
            document_id,
            pages = pages.len(),
            chunks = chunks.len(),
            "chunked document"
        );

        chunks
    }
}
