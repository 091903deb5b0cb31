//! Qdrant store over its REST API. Point ids are UUIDv5 digests of the
//! catalog's string ids — deterministic like the upstream hash remap but
//! collision-free — and the native id rides along in the payload as
//! `original_id` for reverse lookup.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::models::program::{ProgramItem, ProgramType};
use crate::retrieval::{RetrievalError, ScoredProgram, VectorIndex};

/// Dimension of solar-embedding-1-large vectors.
const VECTOR_SIZE: usize = 4096;
const REQUEST_TIMEOUT_SECS: u64 = 60;

pub struct QdrantStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    collection: String,
}

impl QdrantStore {
    pub fn new(base_url: String, api_key: Option<String>, collection: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            collection,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            builder = builder.header("api-key", key);
        }
        builder
    }

    async fn check(response: reqwest::Response) -> Result<Value, RetrievalError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

/// Deterministic UUID for a catalog string id. The store only accepts
/// integer or UUID keys.
pub fn point_id(program_id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, program_id.as_bytes())
}

#[async_trait]
impl VectorIndex for QdrantStore {
    async fn ensure_collection(&self) -> Result<(), RetrievalError> {
        let path = format!("/collections/{}", self.collection);
        let exists = self
            .request(reqwest::Method::GET, &path)
            .send()
            .await?
            .status()
            .is_success();
        if exists {
            return Ok(());
        }

        info!("creating vector collection: {}", self.collection);
        let response = self
            .request(reqwest::Method::PUT, &path)
            .json(&json!({
                "vectors": { "size": VECTOR_SIZE, "distance": "Cosine" }
            }))
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn upsert(
        &self,
        program: &ProgramItem,
        vector: Vec<f32>,
        text_content: &str,
    ) -> Result<(), RetrievalError> {
        let mut payload = serde_json::to_value(program)?;
        payload["original_id"] = json!(program.id);
        payload["text_content"] = json!(text_content);

        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/collections/{}/points?wait=true", self.collection),
            )
            .json(&json!({
                "points": [{
                    "id": point_id(&program.id),
                    "vector": vector,
                    "payload": payload,
                }]
            }))
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    async fn search(
        &self,
        vector: &[f32],
        program_type: ProgramType,
        limit: usize,
    ) -> Result<Vec<ScoredProgram>, RetrievalError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/collections/{}/points/search", self.collection),
            )
            .json(&json!({
                "vector": vector,
                "limit": limit,
                "with_payload": true,
                "filter": {
                    "must": [{ "key": "type", "match": { "value": program_type.as_str() } }]
                }
            }))
            .send()
            .await?;

        let body = Self::check(response).await?;
        let hits = body
            .get("result")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let score = hit.get("score").and_then(Value::as_f64).unwrap_or(0.0) as f32;
            let payload = hit.get("payload").cloned().unwrap_or(Value::Null);
            let program: ProgramItem = serde_json::from_value(payload)?;
            results.push(ScoredProgram { program, score });
        }
        Ok(results)
    }
}
