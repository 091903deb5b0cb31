//! Prompt constants and builders for the re-ranker, plus the labeled-line
//! profile text used as the embedding query. Line order in the query text is
//! fixed — embeddings must be reproducible for identical profiles.

use crate::matching::rerank::Candidate;
use crate::models::domain::SeniorProfile;

/// System prompt for the generative re-ranker — fixes the JSON output schema.
pub const RERANK_SYSTEM: &str = "\
너는 시니어에게 맞는 일자리·정책·교육 프로그램을 점수화하는 랭커다.
입력: 시니어 프로필 JSON과 후보 목록.
출력: JSON만, 각 추천에 id/score/reason을 포함한다.
- score는 0~1 사이 숫자, 소수 2자리까지.
- reason은 1~2문장 한국어로, 왜 맞는지 설명.
형식:
{\"recommendations\": [{\"id\": \"job_001\", \"score\": 0.92, \"reason\": \"간단한 이유\"}]}";

/// Builds the user message: serialized profile plus a plain-text enumeration
/// of the candidates with their initial scores.
pub fn build_rerank_user_prompt(
    profile_json: &str,
    candidates: &[Candidate],
    top_n: usize,
) -> String {
    let candidate_text = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let p = &c.program;
            format!(
                "{}. id: {}\n   title: {}\n   type: {}\n   region: {}\n   description: {}\n   benefits: {}\n   requirements: {}\n   tags: {}\n   initial_score: {:.2}",
                idx + 1,
                p.id,
                p.title,
                p.program_type.as_str(),
                p.region,
                p.description.as_deref().unwrap_or("-"),
                p.benefits.as_deref().unwrap_or("-"),
                p.requirements.as_deref().unwrap_or("-"),
                p.tags.join(", "),
                c.initial_score,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "프로필:\n{profile_json}\n\n후보 목록:\n{candidate_text}\n\n위 후보 중 최상위 {top_n}개를 골라 JSON으로 반환해라:\n{{\n  \"recommendations\": [\n    {{ \"id\": \"job_001\", \"score\": 0.92, \"reason\": \"간단한 이유\" }}\n  ]\n}}"
    )
}

/// Renders a profile to the labeled lines embedded as the search query.
pub fn build_profile_query_text(profile: &SeniorProfile, default_region: &str) -> String {
    let region = profile.region.as_deref().unwrap_or(default_region);
    [
        format!("지역: {region}"),
        format!("이전 직업: {}", profile.previous_job),
        format!("보유 역량: {}", profile.skills.join(", ")),
        format!("활동량: {}", profile.activity_level),
        format!("선호 자세: {}", profile.work_posture),
        format!("주당 근무일: {}", profile.weekly_work_days),
        format!("희망 급여: {}", profile.salary_expectation),
        format!("사회 성향: {}", profile.social_preference),
        format!("학습 성향: {}", profile.learning_preference),
        format!("디지털 활용: {}", profile.digital_literacy),
        format!("목적: {}", profile.motivation),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::JobItem;
    use crate::models::program::ProgramItem;

    fn candidate(id: &str) -> Candidate {
        let job = JobItem {
            id: id.to_string(),
            title: "환경 지킴이".to_string(),
            region: "부산".to_string(),
            work_days: 3,
            work_type: String::new(),
            activity_level: "중간".to_string(),
            posture: String::new(),
            min_salary: 1_000_000,
            max_salary: 1_500_000,
            social_level: "중간".to_string(),
            requires_digital: false,
            tags: vec!["야외".to_string()],
            description: "공원 환경 정비".to_string(),
            deadline: String::new(),
        };
        Candidate {
            program: ProgramItem::from(&job),
            initial_score: 7.5,
        }
    }

    #[test]
    fn test_rerank_prompt_enumerates_candidates_with_scores() {
        let prompt = build_rerank_user_prompt("{}", &[candidate("job_001"), candidate("job_002")], 3);
        assert!(prompt.contains("1. id: job_001"));
        assert!(prompt.contains("2. id: job_002"));
        assert!(prompt.contains("initial_score: 7.50"));
        assert!(prompt.contains("최상위 3개"));
    }

    #[test]
    fn test_query_text_line_order_is_stable() {
        let profile = SeniorProfile {
            previous_job: "버스 기사".to_string(),
            skills: vec!["운전".to_string(), "안전관리".to_string()],
            region: None,
            ..SeniorProfile::default()
        };
        let text = build_profile_query_text(&profile, "부산");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "지역: 부산");
        assert_eq!(lines[1], "이전 직업: 버스 기사");
        assert_eq!(lines[2], "보유 역량: 운전, 안전관리");
        assert_eq!(lines.len(), 11);
    }
}
