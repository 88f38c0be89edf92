mod chunk;
mod query;

use std::fs;
use std::path::Path;

use anyhow::Context;
use docrag_core::models::PageLayout;

use crate::cli::{Cli, Commands};
use crate::config;

pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let file_config = config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Chunk(args) => chunk::execute(args, cli.json, &file_config).await,
        Commands::Query(args) => query::execute(args, cli.json, &file_config).await,
    }
}

/// Read a page-layout JSON file: an array of pages, each with a page
/// number and its text blocks in reading order.
pub(crate) fn read_layout(path: &Path) -> anyhow::Result<Vec<PageLayout>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file {}", path.display()))?;
    let pages: Vec<PageLayout> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse layout file {}", path.display()))?;
    Ok(pages)
}

/// Document id from an explicit flag or the layout file stem.
pub(crate) fn document_id(explicit: Option<&str>, layout: &Path) -> String {
    match explicit {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => layout
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string()),
    }
}
