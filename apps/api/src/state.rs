use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::pipeline::MatchPipeline;
use crate::retrieval::RetrievalBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    pub catalog: Arc<Catalog>,
    /// The matching pipeline with its ranker and optional retrieval backend
    /// wired in at startup.
    pub pipeline: Arc<MatchPipeline>,
    /// Present only when `UPSTAGE_API_KEY` is configured; the ingestion
    /// endpoints need it directly.
    pub retrieval: Option<RetrievalBackend>,
    /// Chat client reused by ingestion for program-text naturalization.
    pub llm: LlmClient,
}
