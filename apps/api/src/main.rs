mod catalog;
mod config;
mod errors;
mod llm_client;
mod matching;
mod models;
mod retrieval;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::pipeline::MatchPipeline;
use crate::matching::rerank::{GenerativeRanker, RankerWithFallback};
use crate::retrieval::embedding::SolarEmbeddingClient;
use crate::retrieval::qdrant::QdrantStore;
use crate::retrieval::RetrievalBackend;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("busg_api={}", &config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting busg API v{}", env!("CARGO_PKG_VERSION"));

    // Load the immutable catalog snapshot
    let catalog = Arc::new(Catalog::load(Path::new(&config.data_dir))?);
    info!(
        "Catalog loaded: {} jobs, {} policies, {} educations",
        catalog.jobs.len(),
        catalog.policies.len(),
        catalog.educations.len()
    );

    // Chat client — shared by the re-ranker and program-text naturalization
    let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_llm_model.clone());
    info!("LLM client initialized (model: {})", config.openai_llm_model);

    // Retrieval backend is optional: without an embedding key, matching runs
    // rule-based only.
    let retrieval = config.upstage_api_key.clone().map(|upstage_key| {
        info!("Retrieval backend enabled (qdrant: {})", config.qdrant_url);
        RetrievalBackend {
            embedder: Arc::new(SolarEmbeddingClient::new(upstage_key)),
            index: Arc::new(QdrantStore::new(
                config.qdrant_url.clone(),
                config.qdrant_api_key.clone(),
                config.qdrant_collection.clone(),
            )),
        }
    });
    if retrieval.is_none() {
        info!("UPSTAGE_API_KEY not set — RAG path disabled, rule-based matching only");
    }

    // Matching pipeline: generative re-rank with heuristic fallback
    let ranker = RankerWithFallback::new(Arc::new(GenerativeRanker::new(llm.clone())));
    let pipeline = Arc::new(MatchPipeline::new(
        catalog.clone(),
        ranker,
        retrieval.clone(),
        config.default_region.clone(),
    ));

    let state = AppState {
        config: config.clone(),
        catalog,
        pipeline,
        retrieval,
        llm,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
