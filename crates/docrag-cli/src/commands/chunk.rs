use console::style;
use docrag_core::models::TextChunk;
use docrag_core::processing::Chunker;
use tabled::{settings::Style, Table, Tabled};

use crate::cli::ChunkArgs;
use crate::commands::{document_id, read_layout};
use crate::config::{resolve_chunking, FileConfig};

#[derive(Tabled)]
struct ChunkRow {
    #[tabled(rename = "id")]
    id: String,

    #[tabled(rename = "page")]
    page: u32,

    #[tabled(rename = "parent")]
    parent: String,

    #[tabled(rename = "split")]
    split: bool,

    #[tabled(rename = "words")]
    words: usize,
}

impl From<&TextChunk> for ChunkRow {
    fn from(chunk: &TextChunk) -> Self {
        Self {
            id: chunk.id.clone(),
            page: chunk.page_id,
            parent: chunk.parent_block.to_string(),
            split: chunk.split,
            words: chunk.wordcount,
        }
    }
}

pub async fn execute(args: &ChunkArgs, json: bool, file: &FileConfig) -> anyhow::Result<()> {
    let pages = read_layout(&args.layout)?;
    let document_id = document_id(args.document_id.as_deref(), &args.layout);

    let config = resolve_chunking(file, args.chunk_size, args.overlap, args.oversize_factor);
    let chunker = Chunker::new(config)?;
    let chunks = chunker.chunk(&document_id, &pages);

    if json {
        println!("{}", serde_json::to_string_pretty(&chunks)?);
        return Ok(());
    }

    let rows: Vec<ChunkRow> = chunks.iter().map(ChunkRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let split_count = chunks.iter().filter(|c| c.split).count();
    let total_words: usize = chunks.iter().map(|c| c.wordcount).sum();
    println!(
        "{} {} chunks ({} from split blocks, {} words) across {} pages",
        style("Chunked:").bold().green(),
        chunks.len(),
        split_count,
        total_words,
        pages.len(),
    );

    Ok(())
}
