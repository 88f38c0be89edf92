use std::sync::Arc;
use std::time::Duration;

use console::style;
use docrag_core::config::RetrievalConfig;
use docrag_core::ports::{Embedder, Generator};
use docrag_core::processing::Chunker;
use docrag_index::VectorIndex;
use docrag_llm::{LmStudioChat, LmStudioConfig, LmStudioEmbedder};
use docrag_retrieval::{RagPipeline, SourceReference};
use tabled::{settings::Style, Table, Tabled};
use tokio::sync::RwLock;

use crate::cli::QueryArgs;
use crate::commands::{document_id, read_layout};
use crate::config::{resolve_chunking, resolve_llm, FileConfig};

#[derive(Tabled)]
struct SourceRow {
    #[tabled(rename = "rank")]
    rank: usize,

    #[tabled(rename = "score")]
    score: String,

    #[tabled(rename = "chunk")]
    chunk_id: String,

    #[tabled(rename = "page")]
    page: u32,

    #[tabled(rename = "split")]
    split: bool,
}

impl From<&SourceReference> for SourceRow {
    fn from(source: &SourceReference) -> Self {
        Self {
            rank: source.rank,
            score: format!("{:.3}", source.score),
            chunk_id: source.chunk_id.clone(),
            page: source.page_id,
            split: source.split,
        }
    }
}

pub async fn execute(args: &QueryArgs, json: bool, file: &FileConfig) -> anyhow::Result<()> {
    let pages = read_layout(&args.layout)?;
    let document_id = document_id(args.document_id.as_deref(), &args.layout);

    let chunking = resolve_chunking(file, args.chunk_size, args.overlap, args.oversize_factor);
    let chunker = Chunker::new(chunking)?;
    let chunks = chunker.chunk(&document_id, &pages);

    if chunks.is_empty() {
        anyhow::bail!("layout file {} produced no usable chunks", args.layout.display());
    }

    let llm = resolve_llm(
        file,
        args.llm_url.clone(),
        args.embed_model.clone(),
        args.embed_dim,
        args.chat_model.clone(),
    );
    let lm_config = LmStudioConfig::new(llm.base_url.clone())
        .with_timeout(Duration::from_secs(llm.timeout_secs));

    let embedder: Arc<dyn Embedder> =
        Arc::new(LmStudioEmbedder::new(lm_config.clone(), llm.embed_model, llm.embed_dim));
    let generator: Arc<dyn Generator> = Arc::new(LmStudioChat::new(lm_config, llm.chat_model));

    if !json {
        println!(
            "{} {} chunks from {}",
            style("Indexing").bold(),
            chunks.len(),
            args.layout.display(),
        );
    }

    let index = VectorIndex::build(&chunks, embedder.as_ref()).await?;

    let pipeline = RagPipeline::new(
        Arc::new(RwLock::new(index)),
        embedder,
        generator,
        RetrievalConfig { top_k: args.top_k, neighbor_window: false },
    );

    let answer = pipeline.answer(&args.question, None).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
        return Ok(());
    }

    println!();
    println!("{}", style("Answer").bold().green());
    println!("{}", answer.answer);
    println!();
    println!("{}", style("Sources").bold());
    let rows: Vec<SourceRow> = answer.sources.iter().map(SourceRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    Ok(())
}
