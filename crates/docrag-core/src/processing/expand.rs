use crate::models::TextChunk;

/// Reconstructs grounding context around a retrieved chunk.
///
/// Small-to-big: a windowed child is expanded back to its full parent
/// block, while a whole-block hit is already a complete semantic unit
/// and stands alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct Expander {
    neighbor_window: bool,
}

impl Expander {
    /// Create an expander. `neighbor_window` additionally pulls in the
    /// chunks adjacent to a whole-block hit; it defaults to off.
    pub fn new(neighbor_window: bool) -> Self {
        Self { neighbor_window }
    }

    /// Expand a retrieved chunk against the ordered corpus sequence.
    ///
    /// A split hit returns every chunk sharing its document and parent
    /// block, in original relative order. An unsplit hit returns only
    /// itself (plus its direct neighbors when the window option is on).
    pub fn expand(&self, hit: &TextChunk, chunks: &[TextChunk]) -> Vec<TextChunk> {
        if hit.split {
            let siblings: Vec<TextChunk> = chunks
                .iter()
                .filter(|c| {
                    c.document_id == hit.document_id && c.parent_block == hit.parent_block
                })
                .cloned()
                .collect();
            if siblings.is_empty() {
                return vec![hit.clone()];
            }
            return siblings;
        }

        if !self.neighbor_window {
            return vec![hit.clone()];
        }

        let Some(pos) = chunks
            .iter()
            .position(|c| c.document_id == hit.document_id && c.id == hit.id)
        else {
            return vec![hit.clone()];
        };

        let mut out = Vec::with_capacity(3);
        if pos > 0 && chunks[pos - 1].document_id == hit.document_id {
            out.push(chunks[pos - 1].clone());
        }
        out.push(hit.clone());
        if let Some(next) = chunks.get(pos + 1) {
            if next.document_id == hit.document_id {
                out.push(next.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChunkingConfig;
    use crate::models::{PageLayout, TextBlock};
    use crate::processing::Chunker;

    fn corpus() -> Vec<TextChunk> {
        let text: String = (0..300).map(|i| format!("w{i} ")).collect();
        let chunker = Chunker::new(ChunkingConfig {
            chunk_size: 100,
            overlap: 20,
            oversize_factor: 1.2,
        })
        .unwrap();
        let pages = vec![PageLayout::new(
            1,
            vec![
                TextBlock::body("a small leading block"),
                TextBlock::body(text),
                TextBlock::body("a small trailing block"),
            ],
        )];
        chunker.chunk("doc", &pages)
    }

    #[test]
    fn test_split_hit_expands_to_full_parent() {
        let chunks = corpus();
        let hit = chunks.iter().find(|c| c.split).unwrap().clone();

        let expanded = Expander::default().expand(&hit, &chunks);

        assert_eq!(expanded.len(), 4);
        assert!(expanded.iter().all(|c| c.parent_block == hit.parent_block));
        // Original relative order is preserved.
        for pair in expanded.windows(2) {
            assert!(pair[0].chunk_index < pair[1].chunk_index);
        }
        let total_words: usize = expanded.iter().map(|c| c.wordcount).sum();
        assert!(total_words >= 300);
    }

    #[test]
    fn test_unsplit_hit_returns_only_itself() {
        let chunks = corpus();
        let hit = chunks[0].clone();
        assert!(!hit.split);

        let expanded = Expander::default().expand(&hit, &chunks);

        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].id, hit.id);
    }

    #[test]
    fn test_neighbor_window_adds_adjacent_chunks() {
        let chunks = corpus();
        let last = chunks.last().unwrap().clone();
        assert!(!last.split);

        let expanded = Expander::new(true).expand(&last, &chunks);

        // Previous chunk plus the hit; nothing follows the last chunk.
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[1].id, last.id);

        let first = chunks[0].clone();
        let expanded = Expander::new(true).expand(&first, &chunks);
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].id, first.id);
    }

    #[test]
    fn test_neighbor_window_stays_within_document() {
        let mut chunks = corpus();
        let mut other = corpus();
        for c in &mut other {
            c.document_id = "other".to_string();
            c.id = c.id.replace("doc-", "other-");
        }
        let hit = other[0].clone();
        chunks.extend(other);

        let expanded = Expander::new(true).expand(&hit, &chunks);

        assert!(expanded.iter().all(|c| c.document_id == "other"));
    }

    #[test]
    fn test_split_hit_without_siblings_falls_back_to_hit() {
        let chunks = corpus();
        let mut orphan = chunks.iter().find(|c| c.split).unwrap().clone();
        orphan.document_id = "missing".to_string();

        let expanded = Expander::default().expand(&orphan, &chunks);

        assert_eq!(expanded.len(), 1);
        assert_eq!(expanded[0].id, orphan.id);
    }
}
