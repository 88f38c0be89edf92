use std::env;

use docrag_core::config::{ChunkingConfig, RetrievalConfig};
use docrag_llm::lmstudio::{DEFAULT_CHAT_MODEL, DEFAULT_EMBED_DIM, DEFAULT_EMBED_MODEL};

/// API server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub llm: LlmSettings,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
}

/// Model server settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub embed_model: String,
    pub embed_dim: usize,
    pub chat_model: String,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            embed_dim: DEFAULT_EMBED_DIM,
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl ApiConfig {
    /// Load configuration from `DOCRAG_*` environment variables,
    /// falling back to documented defaults.
    pub fn from_env() -> Self {
        let port = env::var("DOCRAG_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8000);

        let cors_origin = env::var("DOCRAG_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let defaults = LlmSettings::default();
        let llm = LlmSettings {
            base_url: env::var("DOCRAG_LLM_URL").unwrap_or(defaults.base_url),
            embed_model: env::var("DOCRAG_EMBED_MODEL").unwrap_or(defaults.embed_model),
            embed_dim: env::var("DOCRAG_EMBED_DIM")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(defaults.embed_dim),
            chat_model: env::var("DOCRAG_CHAT_MODEL").unwrap_or(defaults.chat_model),
            timeout_secs: env::var("DOCRAG_LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        };

        let chunking_defaults = ChunkingConfig::default();
        let chunking = ChunkingConfig {
            chunk_size: env::var("DOCRAG_CHUNK_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chunking_defaults.chunk_size),
            overlap: env::var("DOCRAG_CHUNK_OVERLAP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chunking_defaults.overlap),
            oversize_factor: env::var("DOCRAG_OVERSIZE_FACTOR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(chunking_defaults.oversize_factor),
        };

        let retrieval_defaults = RetrievalConfig::default();
        let retrieval = RetrievalConfig {
            top_k: env::var("DOCRAG_TOP_K")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(retrieval_defaults.top_k),
            neighbor_window: env::var("DOCRAG_NEIGHBOR_WINDOW")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(retrieval_defaults.neighbor_window),
        };

        Self { port, cors_origin, llm, chunking, retrieval }
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
