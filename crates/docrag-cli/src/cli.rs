use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docrag - Document retrieval-augmented generation
#[derive(Parser, Debug)]
#[command(name = "docrag")]
#[command(about = "Retrieval-augmented generation over extracted page layouts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chunk a page-layout file and show the resulting chunks
    Chunk(ChunkArgs),

    /// Ask a question against a page-layout file
    Query(QueryArgs),
}

#[derive(Parser, Debug)]
pub struct ChunkArgs {
    /// Path to a page-layout JSON file (an array of pages)
    pub layout: PathBuf,

    /// Document id (defaults to the layout file stem)
    #[arg(long)]
    pub document_id: Option<String>,

    /// Target words per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Word overlap between split windows
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Oversize multiplier above which a block is split
    #[arg(long)]
    pub oversize_factor: Option<f32>,
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Path to a page-layout JSON file (an array of pages)
    pub layout: PathBuf,

    /// The question to answer
    pub question: String,

    /// Number of hits to retrieve
    #[arg(long, default_value = "5")]
    pub top_k: usize,

    /// Document id (defaults to the layout file stem)
    #[arg(long)]
    pub document_id: Option<String>,

    /// Target words per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Word overlap between split windows
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Oversize multiplier above which a block is split
    #[arg(long)]
    pub oversize_factor: Option<f32>,

    /// OpenAI-compatible model server URL
    #[arg(long)]
    pub llm_url: Option<String>,

    /// Embedding model name
    #[arg(long)]
    pub embed_model: Option<String>,

    /// Embedding dimensionality
    #[arg(long)]
    pub embed_dim: Option<usize>,

    /// Chat model name
    #[arg(long)]
    pub chat_model: Option<String>,
}
