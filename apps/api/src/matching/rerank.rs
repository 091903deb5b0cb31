//! Re-ranking — pluggable, trait-based ranker over a type-partitioned
//! candidate set.
//!
//! `GenerativeRanker` asks the chat model for a justified top-N;
//! `HeuristicRanker` turns the pre-filter ordering into synthetic scores and
//! is always available. `RankerWithFallback` composes the two so a failed
//! generative call degrades deterministically instead of erroring.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm_client::{LlmClient, LlmError};
use crate::matching::prompts::{build_rerank_user_prompt, RERANK_SYSTEM};
use crate::models::domain::{RankedRecommendation, SeniorProfile};
use crate::models::program::ProgramItem;

/// Reason attached to every heuristic-fallback recommendation.
pub const FALLBACK_REASON: &str = "규칙 기반 매칭 결과입니다.";

/// A candidate entering the re-rank stage: the normalized program plus the
/// score that put it here (heuristic score for filtered candidates, cosine
/// similarity for vector hits).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub program: ProgramItem,
    pub initial_score: f64,
}

/// One re-ranked result. Scores are 0–1 regardless of which ranker produced
/// them.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub program: ProgramItem,
    pub score: f64,
    pub reason: String,
}

/// Output of a re-ranked partition, tagged with whether the generative step
/// was replaced by the heuristic fallback.
#[derive(Debug, Clone)]
pub struct RankedPartition {
    pub recommendations: Vec<Recommendation>,
    pub degraded: bool,
}

impl RankedPartition {
    pub fn empty() -> Self {
        RankedPartition {
            recommendations: Vec::new(),
            degraded: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RerankOutput {
    #[serde(default)]
    recommendations: Vec<RankedRecommendation>,
}

/// The ranker capability. Carried as `Arc<dyn Ranker>` so tests can inject
/// stubs.
#[async_trait]
pub trait Ranker: Send + Sync {
    async fn rank(
        &self,
        profile: &SeniorProfile,
        candidates: &[Candidate],
        top_n: usize,
    ) -> Result<Vec<Recommendation>, LlmError>;
}

// ── GenerativeRanker ────────────────────────────────────────────────────────

/// LLM-backed ranker. Returned ids are mapped back to candidates by exact
/// match against the native id and, for vector-store hits, `original_id`;
/// anything that matches neither is dropped silently.
pub struct GenerativeRanker {
    llm: LlmClient,
}

impl GenerativeRanker {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Ranker for GenerativeRanker {
    async fn rank(
        &self,
        profile: &SeniorProfile,
        candidates: &[Candidate],
        top_n: usize,
    ) -> Result<Vec<Recommendation>, LlmError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let profile_json = serde_json::to_string_pretty(profile)?;
        let user_prompt = build_rerank_user_prompt(&profile_json, candidates, top_n);
        let output: RerankOutput = self.llm.call_json(RERANK_SYSTEM, &user_prompt).await?;

        Ok(map_ranked_ids(output.recommendations, candidates))
    }
}

/// Resolves re-ranked ids back to candidates. Unknown ids are not an error:
/// they are logged and skipped, which can legitimately empty a partition.
fn map_ranked_ids(
    ranked: Vec<RankedRecommendation>,
    candidates: &[Candidate],
) -> Vec<Recommendation> {
    ranked
        .into_iter()
        .filter_map(|rec| {
            let matched = candidates.iter().find(|c| {
                c.program.id == rec.id || c.program.original_id.as_deref() == Some(rec.id.as_str())
            });
            match matched {
                Some(candidate) => Some(Recommendation {
                    program: candidate.program.clone(),
                    score: rec.score,
                    reason: rec.reason,
                }),
                None => {
                    debug!("reranker returned unknown id, dropping: {}", rec.id);
                    None
                }
            }
        })
        .collect()
}

// ── HeuristicRanker ─────────────────────────────────────────────────────────

/// Deterministic ranker over the pre-filter ordering. Infallible.
pub struct HeuristicRanker;

impl HeuristicRanker {
    pub fn rank(&self, candidates: &[Candidate], top_n: usize) -> Vec<Recommendation> {
        candidates
            .iter()
            .take(top_n)
            .enumerate()
            .map(|(idx, candidate)| Recommendation {
                program: candidate.program.clone(),
                score: fallback_score(candidate.initial_score, idx),
                reason: FALLBACK_REASON.to_string(),
            })
            .collect()
    }
}

/// Synthetic 0–1 score for heuristic fallback: base 0.6, plus a twentieth of
/// the initial score, minus a small rank decay, capped at 0.98.
pub fn fallback_score(initial_score: f64, rank: usize) -> f64 {
    (0.6 + initial_score * 0.05 - rank as f64 * 0.02).clamp(0.0, 0.98)
}

// ── RankerWithFallback ──────────────────────────────────────────────────────

/// Decorator: try the primary ranker, fall back to [`HeuristicRanker`] on
/// any error. Never fails; reports degradation so the caller can set the
/// provenance flag.
#[derive(Clone)]
pub struct RankerWithFallback {
    primary: Arc<dyn Ranker>,
}

impl RankerWithFallback {
    pub fn new(primary: Arc<dyn Ranker>) -> Self {
        Self { primary }
    }

    pub async fn rank(
        &self,
        profile: &SeniorProfile,
        candidates: &[Candidate],
        top_n: usize,
    ) -> RankedPartition {
        match self.primary.rank(profile, candidates, top_n).await {
            Ok(recommendations) => RankedPartition {
                recommendations,
                degraded: false,
            },
            Err(error) => {
                warn!("generative rerank failed, using heuristic ordering: {error}");
                RankedPartition {
                    recommendations: HeuristicRanker.rank(candidates, top_n),
                    degraded: true,
                }
            }
        }
    }
}
