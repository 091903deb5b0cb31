//! Axum route handlers for catalog listing and vector-store ingestion.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::error;

use crate::errors::AppError;
use crate::llm_client::ChatCompleter;
use crate::models::program::ProgramItem;
use crate::retrieval::program_text::program_text;
use crate::retrieval::{EmbeddingMode, RetrievalBackend};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmbedProgramsRequest {
    #[serde(default)]
    pub programs: Vec<ProgramItem>,
}

#[derive(Debug, Serialize)]
pub struct EmbedResult {
    pub id: String,
    pub title: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmbedResponse {
    pub message: String,
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub results: Vec<EmbedResult>,
}

/// GET /api/v1/programs
///
/// All catalog entries normalized to the program shape, with a breakdown.
pub async fn handle_list_programs(State(state): State<AppState>) -> Json<Value> {
    let programs = state.catalog.to_programs();
    Json(json!({
        "total": programs.len(),
        "breakdown": {
            "jobs": state.catalog.jobs.len(),
            "policies": state.catalog.policies.len(),
            "educations": state.catalog.educations.len(),
        },
        "programs": programs,
    }))
}

/// POST /api/v1/programs/embed
///
/// Embeds caller-provided programs into the vector store. Per-item failures
/// are reported, not fatal to the batch.
pub async fn handle_embed_programs(
    State(state): State<AppState>,
    Json(request): Json<EmbedProgramsRequest>,
) -> Result<Json<EmbedResponse>, AppError> {
    if request.programs.is_empty() {
        return Err(AppError::Validation("programs 필드가 비어 있습니다.".to_string()));
    }
    let backend = require_backend(&state)?;
    embed_batch(Some(&state.llm), backend, &request.programs).await
}

/// POST /api/v1/programs/embed-static
///
/// Embeds the whole static catalog.
pub async fn handle_embed_static(
    State(state): State<AppState>,
) -> Result<Json<EmbedResponse>, AppError> {
    let backend = require_backend(&state)?;
    let programs = state.catalog.to_programs();
    embed_batch(Some(&state.llm), backend, &programs).await
}

fn require_backend(state: &AppState) -> Result<&RetrievalBackend, AppError> {
    state.retrieval.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("vector retrieval is not configured".to_string())
    })
}

async fn embed_batch(
    llm: Option<&dyn ChatCompleter>,
    backend: &RetrievalBackend,
    programs: &[ProgramItem],
) -> Result<Json<EmbedResponse>, AppError> {
    backend.index.ensure_collection().await?;

    let mut results = Vec::with_capacity(programs.len());
    for program in programs {
        match embed_one(llm, backend, program).await {
            Ok(()) => results.push(EmbedResult {
                id: program.id.clone(),
                title: program.title.clone(),
                status: "success",
                error: None,
            }),
            Err(e) => {
                error!("failed to embed program {}: {e}", program.id);
                results.push(EmbedResult {
                    id: program.id.clone(),
                    title: program.title.clone(),
                    status: "failed",
                    error: Some(e),
                });
            }
        }
    }

    let success = results.iter().filter(|r| r.status == "success").count();
    let failed = results.len() - success;
    Ok(Json(EmbedResponse {
        message: format!("{success}개 프로그램 임베딩 완료 (실패: {failed})"),
        total: programs.len(),
        success,
        failed,
        results,
    }))
}

async fn embed_one(
    llm: Option<&dyn ChatCompleter>,
    backend: &RetrievalBackend,
    program: &ProgramItem,
) -> Result<(), String> {
    let text = program_text(program, llm).await;
    let vector = backend
        .embedder
        .embed(&text, EmbeddingMode::Passage)
        .await
        .map_err(|e| e.to_string())?;
    backend
        .index
        .upsert(program, vector, &text)
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::program::ProgramType;
    use crate::retrieval::{
        Embedder, EmbeddingError, EmbeddingMode, RetrievalError, ScoredProgram, VectorIndex,
    };
    use async_trait::async_trait;
    use std::sync::Arc;

    fn program(id: &str) -> ProgramItem {
        ProgramItem {
            id: id.to_string(),
            title: format!("프로그램 {id}"),
            program_type: ProgramType::Job,
            region: "부산".to_string(),
            description: None,
            target_age: None,
            benefits: None,
            requirements: None,
            duration: None,
            cost: None,
            start_date: None,
            deadline: None,
            link: None,
            provider: None,
            tags: vec![],
            original_id: None,
        }
    }

    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, _text: &str, _mode: EmbeddingMode) -> Result<Vec<f32>, EmbeddingError> {
            Ok(vec![0.1; 4])
        }
    }

    /// Rejects upserts for one program id, accepts the rest.
    struct StubIndex {
        reject_id: &'static str,
    }

    #[async_trait]
    impl VectorIndex for StubIndex {
        async fn ensure_collection(&self) -> Result<(), RetrievalError> {
            Ok(())
        }

        async fn upsert(
            &self,
            program: &ProgramItem,
            _vector: Vec<f32>,
            _text_content: &str,
        ) -> Result<(), RetrievalError> {
            if program.id == self.reject_id {
                Err(RetrievalError::Api {
                    status: 500,
                    message: "write failed".to_string(),
                })
            } else {
                Ok(())
            }
        }

        async fn search(
            &self,
            _vector: &[f32],
            _program_type: ProgramType,
            _limit: usize,
        ) -> Result<Vec<ScoredProgram>, RetrievalError> {
            Ok(vec![])
        }
    }

    fn backend(reject_id: &'static str) -> RetrievalBackend {
        RetrievalBackend {
            embedder: Arc::new(StubEmbedder),
            index: Arc::new(StubIndex { reject_id }),
        }
    }

    #[tokio::test]
    async fn test_embed_batch_reports_per_item_results() {
        let programs = vec![program("job_001"), program("job_002"), program("job_003")];
        let response = embed_batch(None, &backend("job_002"), &programs)
            .await
            .unwrap()
            .0;

        assert_eq!(response.total, 3);
        assert_eq!(response.success, 2);
        assert_eq!(response.failed, 1);
        assert_eq!(response.message, "2개 프로그램 임베딩 완료 (실패: 1)");
        assert_eq!(response.results[1].id, "job_002");
        assert_eq!(response.results[1].status, "failed");
        assert!(response.results[1].error.is_some());
    }

    #[tokio::test]
    async fn test_embed_batch_one_failure_does_not_abort_the_rest() {
        let programs = vec![program("job_001"), program("job_002"), program("job_003")];
        let response = embed_batch(None, &backend("job_001"), &programs)
            .await
            .unwrap()
            .0;

        // The first item failing must not stop the later ones.
        assert_eq!(response.results.len(), 3);
        assert_eq!(response.results[0].status, "failed");
        assert_eq!(response.results[2].status, "success");
    }
}
