use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite key identifying a source block within a document.
///
/// Replaces the `block_index + page_number * 1000` encoding: a page may
/// hold any number of blocks without colliding with the next page.
/// Chunks from different documents are disambiguated by pairing this
/// key with the chunk's `document_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
    /// 1-based page number
    pub page: u32,

    /// 0-based block index within the page
    pub block: u32,
}

impl BlockId {
    pub fn new(page: u32, block: u32) -> Self {
        Self { page, block }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}-b{}", self.page, self.block)
    }
}

/// The atomic retrievable unit: a chunk of document text with stable
/// identity and provenance back to its source block.
///
/// This is the one canonical chunk representation; serialized forms
/// exist only at API and storage boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Stable id, `{document_id}-p{page}-b{block}` for whole blocks and
    /// `{document_id}-p{page}-b{block}-s{split}` for windowed children
    pub id: String,

    /// Owning document, filename-derived, never empty
    pub document_id: String,

    /// 1-based page number
    pub page_id: u32,

    /// Source block this chunk came from
    pub parent_block: BlockId,

    /// Emission position within one chunking pass over a document
    pub chunk_index: usize,

    /// Normalized (whitespace-collapsed) chunk text
    pub content: String,

    /// True if this chunk is one of several windows cut from an
    /// oversized block
    pub split: bool,

    /// Word count of `content`
    pub wordcount: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_display() {
        assert_eq!(BlockId::new(3, 12).to_string(), "p3-b12");
    }

    #[test]
    fn test_block_id_no_cross_page_collision() {
        // Under the old page * 1000 encoding these two collide.
        let a = BlockId::new(1, 1000);
        let b = BlockId::new(2, 0);
        assert_ne!(a, b);
    }
}
