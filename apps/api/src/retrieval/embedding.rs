//! Upstage Solar embedding client. The query and passage variants are
//! separate models — mixing them up silently degrades recall, so the mode is
//! explicit at every call site.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::retrieval::{Embedder, EmbeddingError, EmbeddingMode};

const SOLAR_EMBEDDINGS_URL: &str = "https://api.upstage.ai/v1/solar/embeddings";
const QUERY_MODEL: &str = "solar-embedding-1-large-query";
const PASSAGE_MODEL: &str = "solar-embedding-1-large-passage";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct SolarEmbeddingClient {
    client: Client,
    api_key: String,
}

impl SolarEmbeddingClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

fn model_for(mode: EmbeddingMode) -> &'static str {
    match mode {
        EmbeddingMode::Query => QUERY_MODEL,
        EmbeddingMode::Passage => PASSAGE_MODEL,
    }
}

#[async_trait]
impl Embedder for SolarEmbeddingClient {
    async fn embed(&self, text: &str, mode: EmbeddingMode) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .client
            .post(SOLAR_EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: model_for(mode),
                input: text,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingResponse = response.json().await.map_err(EmbeddingError::Http)?;
        body.data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbeddingError::EmptyResponse)
    }
}
