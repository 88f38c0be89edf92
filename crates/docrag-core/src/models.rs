pub mod chat;
pub mod chunk;
pub mod layout;

pub use chat::{ChatMessage, ChatRole};
pub use chunk::{BlockId, TextChunk};
pub use layout::{BlockKind, PageLayout, TextBlock};
