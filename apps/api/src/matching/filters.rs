//! Candidate filters. Jobs get the fine-grained heuristic score and a stable
//! descending sort; policies and education programs are eligibility-filtered
//! in catalog order, leaving their fine ranking to the optional RAG stage.

use crate::matching::scoring::score_job;
use crate::matching::text::{is_close_region, normalize};
use crate::models::domain::{EducationItem, JobItem, PolicyItem, SeniorProfile};

/// A job with its heuristic score, as produced by [`filter_jobs`].
#[derive(Debug, Clone)]
pub struct ScoredJob {
    pub job: JobItem,
    pub score: f64,
}

/// Scores every job, sorts descending (stable, so catalog order breaks
/// ties), and keeps the top `limit`.
pub fn filter_jobs(
    profile: &SeniorProfile,
    jobs: &[JobItem],
    limit: usize,
    default_region: &str,
) -> Vec<ScoredJob> {
    let mut scored: Vec<ScoredJob> = jobs
        .iter()
        .map(|job| ScoredJob {
            job: job.clone(),
            score: score_job(profile, job, default_region),
        })
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored
}

/// Keeps nationwide policies and those close to the profile's region, in
/// catalog order.
pub fn filter_policies(
    profile: &SeniorProfile,
    policies: &[PolicyItem],
    limit: usize,
    default_region: &str,
) -> Vec<PolicyItem> {
    let region = profile.region.as_deref().unwrap_or(default_region);
    policies
        .iter()
        .filter(|p| {
            p.region == "전국"
                || is_close_region(&p.region, region)
                || normalize(region).contains(&normalize(&p.region))
        })
        .take(limit)
        .cloned()
        .collect()
}

/// Keeps online programs and those close to the profile's region, then drops
/// anything requiring digital skills when the profile reads as low digital
/// literacy. Catalog order preserved.
pub fn filter_educations(
    profile: &SeniorProfile,
    educations: &[EducationItem],
    limit: usize,
    default_region: &str,
) -> Vec<EducationItem> {
    let region = profile.region.as_deref().unwrap_or(default_region);
    let digital_low = normalize(&profile.digital_literacy).contains('낮');
    educations
        .iter()
        .filter(|e| {
            e.region == "온라인"
                || is_close_region(&e.region, region)
                || normalize(region).contains(&normalize(&e.region))
        })
        .filter(|e| !(e.requires_digital && digital_low))
        .take(limit)
        .cloned()
        .collect()
}
