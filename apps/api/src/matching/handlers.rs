//! Axum route handlers for the Matching API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::matching::pipeline::{MatchOptions, RecommendationResponse};
use crate::models::domain::SeniorProfile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    /// Required; everything downstream of it degrades gracefully, but a
    /// request without a profile has nothing to match.
    pub profile: Option<SeniorProfile>,
    #[serde(rename = "topK", default = "default_top_k")]
    pub top_k: usize,
    #[serde(rename = "useRAG", default = "default_use_rag")]
    pub use_rag: bool,
}

fn default_top_k() -> usize {
    3
}

fn default_use_rag() -> bool {
    true
}

/// POST /api/v1/recommendations
///
/// Matches a profile against the catalog and returns the three top-lists.
/// Never fails on upstream AI errors — those surface only as
/// `source: "rule-based"`.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let profile = request
        .profile
        .ok_or_else(|| AppError::Validation("profile 필드가 필요합니다.".to_string()))?;

    let options = MatchOptions {
        top_k: request.top_k,
        use_rag: request.use_rag,
    };

    Ok(Json(state.pipeline.run(&profile, options).await))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: RecommendationRequest =
            serde_json::from_str(r#"{"profile": {"previous_job": "교사"}}"#).unwrap();
        assert_eq!(request.top_k, 3);
        assert!(request.use_rag);
        assert!(request.profile.is_some());
    }

    #[test]
    fn test_request_overrides_wire_names() {
        let request: RecommendationRequest =
            serde_json::from_str(r#"{"profile": {}, "topK": 5, "useRAG": false}"#).unwrap();
        assert_eq!(request.top_k, 5);
        assert!(!request.use_rag);
    }

    #[test]
    fn test_request_without_profile_parses_as_none() {
        let request: RecommendationRequest = serde_json::from_str(r#"{"topK": 2}"#).unwrap();
        assert!(request.profile.is_none());
    }
}
