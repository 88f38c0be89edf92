use serde::{Deserialize, Serialize};

/// Kind of a layout-extracted text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Ordinary body text
    #[default]
    Body,

    /// A caption synthesized upstream from an embedded image
    FigureCaption,
}

/// One text block of a page, as produced by the external layout
/// extraction collaborator. Immutable once handed to the core; the core
/// reads `text`, `wordcount`, and position-in-sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    /// Bounding geometry (x0, y0, x1, y1), opaque to the core
    #[serde(default)]
    pub bbox: Option<[f32; 4]>,

    /// Raw block text
    pub text: String,

    #[serde(default)]
    pub kind: BlockKind,

    /// Word count as reported by the extractor. Advisory; the chunker
    /// recomputes the count from the normalized text.
    #[serde(default)]
    pub wordcount: usize,
}

impl TextBlock {
    /// Create a body-text block, deriving the word count from the text.
    pub fn body(text: impl Into<String>) -> Self {
        let text = text.into();
        let wordcount = text.split_whitespace().count();
        Self { bbox: None, text, kind: BlockKind::Body, wordcount }
    }

    /// Create a figure-caption block, deriving the word count from the
    /// text.
    pub fn figure_caption(text: impl Into<String>) -> Self {
        let text = text.into();
        let wordcount = text.split_whitespace().count();
        Self { bbox: None, text, kind: BlockKind::FigureCaption, wordcount }
    }
}

/// One page of a document: the page number and its text blocks in
/// reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    /// 1-based page number
    pub page_number: u32,

    /// Text blocks in reading order
    pub blocks: Vec<TextBlock>,
}

impl PageLayout {
    pub fn new(page_number: u32, blocks: Vec<TextBlock>) -> Self {
        Self { page_number, blocks }
    }
}
