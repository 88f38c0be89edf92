pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, LlmSettings};
pub use routes::create_router;
pub use state::AppState;
