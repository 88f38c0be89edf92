//! docrag LLM - Capability adapters
//!
//! Implementations of the `Embedder` and `Generator` ports against an
//! OpenAI-compatible local model server (LM Studio).

pub mod lmstudio;

pub use lmstudio::{LmStudioChat, LmStudioConfig, LmStudioEmbedder};
