//! The matching pipeline: candidate filtering, optional vector retrieval,
//! per-partition re-ranking with deterministic fallback, and final assembly.
//!
//! Partitions (job / policy / education) run independently and concurrently;
//! a failure in one never touches the others, and no upstream AI failure
//! ever surfaces to the caller — the response only discloses degraded mode
//! through its `source` field.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::catalog::Catalog;
use crate::matching::filters::{filter_educations, filter_jobs, filter_policies, ScoredJob};
use crate::matching::prompts::build_profile_query_text;
use crate::matching::rerank::{Candidate, RankedPartition, RankerWithFallback, Recommendation};
use crate::models::domain::{EducationItem, JobItem, PolicyItem, SeniorProfile};
use crate::models::program::{ProgramItem, ProgramType};
use crate::retrieval::{EmbeddingMode, RetrievalBackend, RetrievalError, ScoredProgram};

/// Heuristic pre-filter keeps this many jobs for the re-ranker.
const JOB_CANDIDATE_LIMIT: usize = 12;
const POLICY_LIMIT: usize = 3;
const EDUCATION_LIMIT: usize = 3;
/// Per-type cap on vector hits. Searched once per type, never globally,
/// so every category keeps representation.
const PARTITION_SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    pub top_k: usize,
    pub use_rag: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            use_rag: true,
        }
    }
}

/// Provenance of the response: `rag` only when at least one partition's
/// vector-based re-rank actually succeeded and produced output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchSource {
    #[serde(rename = "rag")]
    Rag,
    #[serde(rename = "rule-based")]
    RuleBased,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRecommendation {
    pub job: JobItem,
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub job_recommendations: Vec<JobRecommendation>,
    pub policies: Vec<PolicyItem>,
    pub educations: Vec<EducationItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag_job_recommendations: Option<Vec<Recommendation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag_policy_recommendations: Option<Vec<Recommendation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag_education_recommendations: Option<Vec<Recommendation>>,
    pub source: MatchSource,
}

pub struct MatchPipeline {
    catalog: Arc<Catalog>,
    ranker: RankerWithFallback,
    retrieval: Option<RetrievalBackend>,
    default_region: String,
}

struct RagPartitions {
    jobs: Vec<Recommendation>,
    policies: Vec<Recommendation>,
    educations: Vec<Recommendation>,
    any_generative: bool,
}

impl MatchPipeline {
    pub fn new(
        catalog: Arc<Catalog>,
        ranker: RankerWithFallback,
        retrieval: Option<RetrievalBackend>,
        default_region: String,
    ) -> Self {
        Self {
            catalog,
            ranker,
            retrieval,
            default_region,
        }
    }

    /// Runs the full match for one profile. Infallible by design: every
    /// external failure degrades to the rule-based result.
    pub async fn run(&self, profile: &SeniorProfile, options: MatchOptions) -> RecommendationResponse {
        let scored_jobs = filter_jobs(
            profile,
            &self.catalog.jobs,
            JOB_CANDIDATE_LIMIT,
            &self.default_region,
        );
        let policies = filter_policies(
            profile,
            &self.catalog.policies,
            POLICY_LIMIT,
            &self.default_region,
        );
        let educations = filter_educations(
            profile,
            &self.catalog.educations,
            EDUCATION_LIMIT,
            &self.default_region,
        );

        let job_candidates = candidates_from_jobs(&scored_jobs);
        let job_partition = self
            .rank_partition(profile, &job_candidates, options.top_k)
            .await;
        let job_recommendations = to_job_recommendations(job_partition.recommendations, &scored_jobs);

        let mut source = MatchSource::RuleBased;
        let mut rag_jobs = None;
        let mut rag_policies = None;
        let mut rag_educations = None;

        if options.use_rag {
            if let Some(backend) = &self.retrieval {
                if let Some(rag) = self
                    .rag_partitions(profile, options.top_k, backend, &scored_jobs, &policies, &educations)
                    .await
                {
                    if rag.any_generative {
                        source = MatchSource::Rag;
                    }
                    rag_jobs = Some(rag.jobs);
                    rag_policies = Some(rag.policies);
                    rag_educations = Some(rag.educations);
                }
            }
        }

        RecommendationResponse {
            job_recommendations,
            policies,
            educations,
            rag_job_recommendations: rag_jobs,
            rag_policy_recommendations: rag_policies,
            rag_education_recommendations: rag_educations,
            source,
        }
    }

    async fn rank_partition(
        &self,
        profile: &SeniorProfile,
        candidates: &[Candidate],
        top_k: usize,
    ) -> RankedPartition {
        if candidates.is_empty() {
            return RankedPartition::empty();
        }
        self.ranker.rank(profile, candidates, top_k).await
    }

    /// The vector-retrieval path: embed the profile once, search the three
    /// type partitions concurrently, then re-rank each concurrently. A
    /// failed search falls back to that partition's filtered candidates.
    async fn rag_partitions(
        &self,
        profile: &SeniorProfile,
        top_k: usize,
        backend: &RetrievalBackend,
        scored_jobs: &[ScoredJob],
        policies: &[PolicyItem],
        educations: &[EducationItem],
    ) -> Option<RagPartitions> {
        let query_text = build_profile_query_text(profile, &self.default_region);
        let vector = match backend.embedder.embed(&query_text, EmbeddingMode::Query).await {
            Ok(vector) => vector,
            Err(error) => {
                warn!("query embedding failed, skipping RAG path: {error}");
                return None;
            }
        };

        let (job_hits, policy_hits, education_hits) = tokio::join!(
            backend.index.search(&vector, ProgramType::Job, PARTITION_SEARCH_LIMIT),
            backend.index.search(&vector, ProgramType::Policy, PARTITION_SEARCH_LIMIT),
            backend.index.search(&vector, ProgramType::Education, PARTITION_SEARCH_LIMIT),
        );

        let (job_candidates, job_vector_ok) =
            partition_candidates(job_hits, ProgramType::Job, || candidates_from_jobs(scored_jobs));
        let (policy_candidates, policy_vector_ok) = partition_candidates(policy_hits, ProgramType::Policy, || {
            candidates_from_programs(policies.iter().map(ProgramItem::from))
        });
        let (education_candidates, education_vector_ok) =
            partition_candidates(education_hits, ProgramType::Education, || {
                candidates_from_programs(educations.iter().map(ProgramItem::from))
            });

        let (jobs, policies, educations) = tokio::join!(
            self.rank_partition(profile, &job_candidates, top_k),
            self.rank_partition(profile, &policy_candidates, top_k),
            self.rank_partition(profile, &education_candidates, top_k),
        );

        let any_generative = partition_generative(&jobs, job_vector_ok)
            || partition_generative(&policies, policy_vector_ok)
            || partition_generative(&educations, education_vector_ok);

        Some(RagPartitions {
            jobs: jobs.recommendations,
            policies: policies.recommendations,
            educations: educations.recommendations,
            any_generative,
        })
    }
}

fn candidates_from_jobs(scored: &[ScoredJob]) -> Vec<Candidate> {
    scored
        .iter()
        .map(|s| Candidate {
            program: ProgramItem::from(&s.job),
            initial_score: s.score,
        })
        .collect()
}

fn candidates_from_programs(programs: impl Iterator<Item = ProgramItem>) -> Vec<Candidate> {
    programs
        .map(|program| Candidate {
            program,
            initial_score: 0.0,
        })
        .collect()
}

/// Vector hits become candidates with their similarity as initial score; a
/// failed search degrades to the filtered candidates for that partition.
fn partition_candidates(
    hits: Result<Vec<ScoredProgram>, RetrievalError>,
    program_type: ProgramType,
    fallback: impl FnOnce() -> Vec<Candidate>,
) -> (Vec<Candidate>, bool) {
    match hits {
        Ok(hits) => (
            hits.into_iter()
                .map(|hit| Candidate {
                    program: hit.program,
                    initial_score: hit.score as f64,
                })
                .collect(),
            true,
        ),
        Err(error) => {
            warn!(
                "vector search failed for {} partition, using filtered candidates: {error}",
                program_type.as_str()
            );
            (fallback(), false)
        }
    }
}

fn partition_generative(partition: &RankedPartition, vector_ok: bool) -> bool {
    vector_ok && !partition.degraded && !partition.recommendations.is_empty()
}

/// Maps re-ranked programs back to their catalog jobs for the job-shaped
/// response list.
fn to_job_recommendations(recommendations: Vec<Recommendation>, scored: &[ScoredJob]) -> Vec<JobRecommendation> {
    recommendations
        .into_iter()
        .filter_map(|rec| {
            scored
                .iter()
                .find(|s| s.job.id == rec.program.id)
                .map(|s| JobRecommendation {
                    job: s.job.clone(),
                    score: rec.score,
                    reason: rec.reason,
                })
        })
        .collect()
}
