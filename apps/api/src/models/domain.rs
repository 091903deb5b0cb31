//! Core domain types: the senior profile produced by the intake flow and the
//! three catalog entry kinds it is matched against.
//!
//! Enum-like fields (`activity_level`, `social_level`) stay free-form strings
//! on purpose: they are filled by an LLM from spoken answers and the scorer
//! treats unknown values as "중간".

use serde::{Deserialize, Serialize};

/// Profile extracted from the six intake answers. Immutable within a matching
/// request; `region: None` means the configured default region applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeniorProfile {
    pub previous_job: String,
    pub skills: Vec<String>,
    /// 낮음 | 중간 | 높음 (anything else is scored as 중간)
    pub activity_level: String,
    pub work_posture: String,
    /// Desired working days per week. 0 means the question went unanswered
    /// and the scorer substitutes 3.
    pub weekly_work_days: u32,
    pub salary_expectation: String,
    pub social_preference: String,
    pub learning_preference: String,
    pub digital_literacy: String,
    pub motivation: String,
    pub persona_summary: String,
    pub region: Option<String>,
}

/// A job posting from the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobItem {
    pub id: String,
    pub title: String,
    pub region: String,
    pub work_days: u32,
    pub work_type: String,
    /// 낮음 | 중간 | 높음
    pub activity_level: String,
    pub posture: String,
    pub min_salary: i64,
    pub max_salary: i64,
    pub social_level: String,
    pub requires_digital: bool,
    pub tags: Vec<String>,
    pub description: String,
    pub deadline: String,
}

/// A benefit / support program. Eligibility-filtered only, never
/// heuristically scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyItem {
    pub id: String,
    pub title: String,
    pub region: String,
    pub target_age: String,
    pub benefit: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Delivery mode of a training program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EducationMode {
    #[serde(rename = "오프라인")]
    Offline,
    #[serde(rename = "온라인")]
    Online,
    #[serde(rename = "혼합")]
    Hybrid,
}

/// A training program from the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationItem {
    pub id: String,
    pub title: String,
    pub region: String,
    pub mode: EducationMode,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    pub requires_digital: bool,
    pub tags: Vec<String>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// One entry of the re-ranker's structured output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRecommendation {
    pub id: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserializes_with_missing_fields() {
        // LLM-produced profiles occasionally omit fields; all must default.
        let profile: SeniorProfile =
            serde_json::from_str(r#"{"previous_job": "경비원", "weekly_work_days": 4}"#).unwrap();
        assert_eq!(profile.previous_job, "경비원");
        assert_eq!(profile.weekly_work_days, 4);
        assert!(profile.region.is_none());
        assert!(profile.skills.is_empty());
    }

    #[test]
    fn test_education_mode_korean_serde() {
        let mode: EducationMode = serde_json::from_str(r#""온라인""#).unwrap();
        assert_eq!(mode, EducationMode::Online);
        assert_eq!(serde_json::to_string(&EducationMode::Hybrid).unwrap(), r#""혼합""#);
    }

    #[test]
    fn test_ranked_recommendation_tolerates_partial_output() {
        let rec: RankedRecommendation = serde_json::from_str(r#"{"id": "job_001"}"#).unwrap();
        assert_eq!(rec.id, "job_001");
        assert_eq!(rec.score, 0.0);
        assert!(rec.reason.is_empty());
    }
}
