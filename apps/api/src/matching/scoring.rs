//! Heuristic job scorer. Pure and deterministic: the score only orders
//! candidates within one catalog, so there is no fixed range — region,
//! schedule, activity, posture, social and salary fit each add a weighted
//! contribution, and a digital-skill mismatch subtracts one.

use crate::matching::text::{is_close_region, normalize, parse_salary};
use crate::models::domain::{JobItem, SeniorProfile};

/// Salary gap (in won) still worth a partial point when the expectation
/// falls outside the posted range.
const SALARY_GAP_TOLERANCE: i64 = 200_000;

fn activity_rank(level: &str) -> i32 {
    match level {
        "낮음" => 1,
        "중간" => 2,
        "높음" => 3,
        _ => 2,
    }
}

/// Compatibility score between a profile and one job posting.
pub fn score_job(profile: &SeniorProfile, job: &JobItem, default_region: &str) -> f64 {
    let region = profile.region.as_deref().unwrap_or(default_region);
    let mut score = 0.0;

    if is_close_region(&job.region, region) {
        score += 3.0;
    }

    // 0 means the intake left the question unanswered.
    let desired_days = if profile.weekly_work_days == 0 {
        3
    } else {
        profile.weekly_work_days
    };
    let day_diff = (job.work_days as i64 - desired_days as i64).unsigned_abs();
    score += match day_diff {
        0 => 2.0,
        1 => 1.0,
        _ => 0.0,
    };

    // A two-level activity mismatch actively hurts, not just fails to help.
    let activity_diff = (activity_rank(&profile.activity_level) - activity_rank(&job.activity_level)).abs();
    score += match activity_diff {
        0 => 2.0,
        1 => 1.0,
        _ => -1.0,
    };

    let posture_pref = normalize(&profile.work_posture);
    if !posture_pref.is_empty() && normalize(&job.posture).contains(&posture_pref) {
        score += 1.5;
    }

    let social_pref = normalize(&profile.social_preference);
    if social_pref.contains('혼') && job.social_level == "낮음" {
        score += 1.0;
    } else if social_pref.contains("같이") && job.social_level != "낮음" {
        score += 1.0;
    }

    if let Some(expected) = parse_salary(&profile.salary_expectation) {
        if expected >= job.min_salary && expected <= job.max_salary {
            score += 2.0;
        } else {
            let gap = if expected < job.min_salary {
                job.min_salary - expected
            } else {
                expected - job.max_salary
            };
            if gap < SALARY_GAP_TOLERANCE {
                score += 1.0;
            }
        }
    }

    if job.requires_digital && normalize(&profile.digital_literacy).contains('낮') {
        score -= 2.0;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_profile() -> SeniorProfile {
        SeniorProfile {
            region: Some("부산".to_string()),
            weekly_work_days: 3,
            activity_level: "중간".to_string(),
            salary_expectation: "200만원".to_string(),
            digital_literacy: "높음".to_string(),
            social_preference: "같이".to_string(),
            ..SeniorProfile::default()
        }
    }

    fn base_job() -> JobItem {
        JobItem {
            id: "job_001".to_string(),
            title: "공원 환경 지킴이".to_string(),
            region: "부산".to_string(),
            work_days: 3,
            work_type: "파트타임".to_string(),
            activity_level: "중간".to_string(),
            posture: "".to_string(),
            min_salary: 1_800_000,
            max_salary: 2_200_000,
            social_level: "높음".to_string(),
            requires_digital: false,
            tags: vec![],
            description: "".to_string(),
            deadline: "".to_string(),
        }
    }

    #[test]
    fn test_reference_scenario_scores_ten() {
        // "200만원" extracts to 200 and scales to 32 000, missing the band;
        // use an explicit monthly figure so the salary contribution fires.
        let mut profile = base_profile();
        profile.salary_expectation = "2000000원".to_string();
        // 3 region + 2 days + 2 activity + 0 posture + 1 social + 2 salary
        assert_eq!(score_job(&profile, &base_job(), "부산"), 10.0);
    }

    #[test]
    fn test_day_fit_is_monotonic_toward_desired_days() {
        let profile = base_profile();
        let exact = base_job();
        let mut off_by_one = base_job();
        off_by_one.work_days = 4;
        let mut off_by_two = base_job();
        off_by_two.work_days = 5;

        let s_exact = score_job(&profile, &exact, "부산");
        let s_one = score_job(&profile, &off_by_one, "부산");
        let s_two = score_job(&profile, &off_by_two, "부산");
        assert!(s_exact >= s_one);
        assert!(s_one >= s_two);
        assert_eq!(s_exact - s_two, 2.0);
    }

    #[test]
    fn test_zero_work_days_defaults_to_three() {
        let mut profile = base_profile();
        profile.weekly_work_days = 0;
        assert_eq!(
            score_job(&profile, &base_job(), "부산"),
            score_job(&base_profile(), &base_job(), "부산")
        );
    }

    #[test]
    fn test_activity_mismatch_of_two_levels_penalizes() {
        let mut profile = base_profile();
        profile.activity_level = "낮음".to_string();
        let mut job = base_job();
        job.activity_level = "높음".to_string();
        let mut matched = base_job();
        matched.activity_level = "낮음".to_string();
        // diff 2 → −1 vs diff 0 → +2: three points apart
        assert_eq!(
            score_job(&profile, &matched, "부산") - score_job(&profile, &job, "부산"),
            3.0
        );
    }

    #[test]
    fn test_unknown_activity_level_reads_as_medium() {
        let mut profile = base_profile();
        profile.activity_level = "활발함".to_string();
        assert_eq!(
            score_job(&profile, &base_job(), "부산"),
            score_job(&base_profile(), &base_job(), "부산")
        );
    }

    #[test]
    fn test_digital_penalty_is_exactly_two() {
        let mut profile = base_profile();
        profile.digital_literacy = "낮음".to_string();
        let mut digital_job = base_job();
        digital_job.requires_digital = true;
        let plain_job = base_job();
        assert_eq!(
            score_job(&profile, &plain_job, "부산") - score_job(&profile, &digital_job, "부산"),
            2.0
        );
    }

    #[test]
    fn test_posture_substring_match_adds_half_bonus() {
        let mut profile = base_profile();
        profile.work_posture = "앉아서".to_string();
        let mut job = base_job();
        job.posture = "주로 앉아서 근무".to_string();
        assert_eq!(
            score_job(&profile, &job, "부산") - score_job(&base_profile(), &base_job(), "부산"),
            1.5
        );
    }

    #[test]
    fn test_solitary_preference_matches_low_social_jobs() {
        let mut profile = base_profile();
        profile.social_preference = "혼자 일하기".to_string();
        let mut quiet_job = base_job();
        quiet_job.social_level = "낮음".to_string();
        let busy_job = base_job();
        assert!(score_job(&profile, &quiet_job, "부산") > score_job(&profile, &busy_job, "부산"));
    }

    #[test]
    fn test_near_miss_salary_gets_partial_point() {
        let mut profile = base_profile();
        profile.salary_expectation = "2300000원".to_string(); // 100 000 over max
        let in_range = {
            let mut p = base_profile();
            p.salary_expectation = "2000000원".to_string();
            p
        };
        let far_off = {
            let mut p = base_profile();
            p.salary_expectation = "3000000원".to_string();
            p
        };
        let job = base_job();
        assert_eq!(score_job(&in_range, &job, "부산") - score_job(&profile, &job, "부산"), 1.0);
        assert_eq!(score_job(&profile, &job, "부산") - score_job(&far_off, &job, "부산"), 1.0);
    }

    #[test]
    fn test_zero_salary_expectation_contributes_nothing() {
        // A zero figure must not enter the gap check; with a low posted
        // minimum it would otherwise pick up the near-miss point.
        let mut zero = base_profile();
        zero.salary_expectation = "0원".to_string();
        let mut blank = base_profile();
        blank.salary_expectation = String::new();
        let mut job = base_job();
        job.min_salary = 100_000;
        job.max_salary = 200_000;
        assert_eq!(score_job(&zero, &job, "부산"), score_job(&blank, &job, "부산"));
    }

    #[test]
    fn test_missing_region_falls_back_to_default() {
        let mut profile = base_profile();
        profile.region = None;
        assert_eq!(
            score_job(&profile, &base_job(), "부산"),
            score_job(&base_profile(), &base_job(), "부산")
        );
        assert!(score_job(&profile, &base_job(), "서울") < score_job(&profile, &base_job(), "부산"));
    }
}
