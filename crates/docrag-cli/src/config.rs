use std::fs;
use std::path::Path;

use anyhow::Context;
use docrag_core::config::ChunkingConfig;
use docrag_llm::lmstudio::{DEFAULT_CHAT_MODEL, DEFAULT_EMBED_DIM, DEFAULT_EMBED_MODEL};
use serde::Deserialize;

/// Optional settings loaded from a TOML config file. Command-line
/// arguments take precedence over file values, which take precedence
/// over the built-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub chunking: ChunkingFileConfig,

    #[serde(default)]
    pub llm: LlmFileConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChunkingFileConfig {
    pub chunk_size: Option<usize>,
    pub overlap: Option<usize>,
    pub oversize_factor: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    pub base_url: Option<String>,
    pub embed_model: Option<String>,
    pub embed_dim: Option<usize>,
    pub chat_model: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Resolved model server settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub embed_model: String,
    pub embed_dim: usize,
    pub chat_model: String,
    pub timeout_secs: u64,
}

pub fn load(path: Option<&Path>) -> anyhow::Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;

    Ok(config)
}

/// Merge chunking parameters: CLI argument, then file value, then
/// default.
pub fn resolve_chunking(
    file: &FileConfig,
    chunk_size: Option<usize>,
    overlap: Option<usize>,
    oversize_factor: Option<f32>,
) -> ChunkingConfig {
    let defaults = ChunkingConfig::default();
    ChunkingConfig {
        chunk_size: chunk_size.or(file.chunking.chunk_size).unwrap_or(defaults.chunk_size),
        overlap: overlap.or(file.chunking.overlap).unwrap_or(defaults.overlap),
        oversize_factor: oversize_factor
            .or(file.chunking.oversize_factor)
            .unwrap_or(defaults.oversize_factor),
    }
}

/// Merge model server settings: CLI argument, then file value, then
/// default.
pub fn resolve_llm(
    file: &FileConfig,
    base_url: Option<String>,
    embed_model: Option<String>,
    embed_dim: Option<usize>,
    chat_model: Option<String>,
) -> LlmSettings {
    LlmSettings {
        base_url: base_url
            .or_else(|| file.llm.base_url.clone())
            .unwrap_or_else(|| "http://localhost:1234/v1".to_string()),
        embed_model: embed_model
            .or_else(|| file.llm.embed_model.clone())
            .unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string()),
        embed_dim: embed_dim.or(file.llm.embed_dim).unwrap_or(DEFAULT_EMBED_DIM),
        chat_model: chat_model
            .or_else(|| file.llm.chat_model.clone())
            .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
        timeout_secs: file.llm.timeout_secs.unwrap_or(120),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_path_yields_defaults() {
        let config = load(None).unwrap();
        let chunking = resolve_chunking(&config, None, None, None);
        assert_eq!(chunking.chunk_size, 100);
        assert_eq!(chunking.overlap, 20);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[chunking]
chunk_size = 150
overlap = 30

[llm]
embed_model = "custom-embedder"
embed_dim = 384
"#
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        let chunking = resolve_chunking(&config, None, None, None);
        assert_eq!(chunking.chunk_size, 150);
        assert_eq!(chunking.overlap, 30);
        assert_eq!(chunking.oversize_factor, 1.5);

        let llm = resolve_llm(&config, None, None, None, None);
        assert_eq!(llm.embed_model, "custom-embedder");
        assert_eq!(llm.embed_dim, 384);
        assert_eq!(llm.chat_model, DEFAULT_CHAT_MODEL);
    }

    #[test]
    fn test_cli_values_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[chunking]\nchunk_size = 150").unwrap();

        let config = load(Some(file.path())).unwrap();
        let chunking = resolve_chunking(&config, Some(80), None, None);
        assert_eq!(chunking.chunk_size, 80);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [").unwrap();

        assert!(load(Some(file.path())).is_err());
    }
}
