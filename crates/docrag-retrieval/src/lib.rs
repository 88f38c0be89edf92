//! docrag Retrieval - Query orchestration
//!
//! This crate implements the retrieval use case: embed a question,
//! search the index, expand hits back to their parent blocks, assemble
//! a grounded prompt, and delegate generation.

pub mod models;
pub mod pipeline;
pub mod prompt;

pub use models::{RagAnswer, SourceReference};
pub use pipeline::RagPipeline;
