use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use docrag_api::{create_router, ApiConfig, AppState};
use docrag_core::ports::{Embedder, Generator};
use docrag_llm::{LmStudioChat, LmStudioConfig, LmStudioEmbedder};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docrag_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();

    tracing::info!(
        port = config.port,
        llm_url = %config.llm.base_url,
        embed_model = %config.llm.embed_model,
        chat_model = %config.llm.chat_model,
        chunk_size = config.chunking.chunk_size,
        chunk_overlap = config.chunking.overlap,
        "Starting docrag API server"
    );

    let lm_config = LmStudioConfig::new(config.llm.base_url.clone())
        .with_timeout(Duration::from_secs(config.llm.timeout_secs));

    let embedder: Arc<dyn Embedder> = Arc::new(LmStudioEmbedder::new(
        lm_config.clone(),
        config.llm.embed_model.clone(),
        config.llm.embed_dim,
    ));
    let generator: Arc<dyn Generator> =
        Arc::new(LmStudioChat::new(lm_config, config.llm.chat_model.clone()));

    let state = Arc::new(AppState::new(embedder, generator, config.chunking, config.retrieval));

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.unwrap();
}
