//! `ProgramItem` — the normalized superset shape shared by the vector store
//! and the re-ranker. Jobs, policies and education programs all flatten into
//! it; `original_id` carries the catalog-native id back out of the store.

use serde::{Deserialize, Serialize};

use crate::models::domain::{EducationItem, JobItem, PolicyItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramType {
    Job,
    Policy,
    Education,
    Other,
}

impl ProgramType {
    /// Wire value used in vector-store payload filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramType::Job => "job",
            ProgramType::Policy => "policy",
            ProgramType::Education => "education",
            ProgramType::Other => "other",
        }
    }

    /// Korean label used when rendering a program to embedding text.
    pub fn label_ko(&self) -> &'static str {
        match self {
            ProgramType::Job => "일자리",
            ProgramType::Policy => "정책",
            ProgramType::Education => "교육",
            ProgramType::Other => "기타",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub program_type: ProgramType,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Catalog-native id, set when the item came back out of the vector
    /// store (point ids are UUID-derived, see `retrieval::qdrant`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<String>,
}

impl From<&JobItem> for ProgramItem {
    fn from(job: &JobItem) -> Self {
        ProgramItem {
            id: job.id.clone(),
            title: job.title.clone(),
            program_type: ProgramType::Job,
            region: job.region.clone(),
            description: Some(job.description.clone()),
            target_age: None,
            benefits: Some(format!("급여: {}~{}원", job.min_salary, job.max_salary)),
            requirements: Some(format!(
                "활동량: {}, 자세: {}, 디지털: {}",
                job.activity_level,
                job.posture,
                if job.requires_digital { "필요" } else { "불필요" }
            )),
            duration: Some(format!("주 {}일", job.work_days)),
            cost: None,
            start_date: None,
            deadline: Some(job.deadline.clone()),
            link: None,
            provider: None,
            tags: job.tags.clone(),
            original_id: None,
        }
    }
}

impl From<&PolicyItem> for ProgramItem {
    fn from(policy: &PolicyItem) -> Self {
        ProgramItem {
            id: policy.id.clone(),
            title: policy.title.clone(),
            program_type: ProgramType::Policy,
            region: policy.region.clone(),
            description: Some(policy.description.clone()),
            target_age: Some(policy.target_age.clone()),
            benefits: Some(policy.benefit.clone()),
            requirements: None,
            duration: None,
            cost: None,
            start_date: None,
            deadline: policy.deadline.clone(),
            link: policy.link.clone(),
            provider: None,
            tags: policy.tags.clone().unwrap_or_default(),
            original_id: None,
        }
    }
}

impl From<&EducationItem> for ProgramItem {
    fn from(education: &EducationItem) -> Self {
        ProgramItem {
            id: education.id.clone(),
            title: education.title.clone(),
            program_type: ProgramType::Education,
            region: education.region.clone(),
            description: Some(education.summary.clone()),
            target_age: None,
            benefits: None,
            requirements: Some(format!(
                "디지털: {}",
                if education.requires_digital { "필요" } else { "불필요" }
            )),
            duration: Some(education.duration.clone()),
            cost: education.cost.clone(),
            start_date: education.start_date.clone(),
            deadline: None,
            link: None,
            provider: education.provider.clone(),
            tags: education.tags.clone(),
            original_id: None,
        }
    }
}
