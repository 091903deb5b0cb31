//! Retrieval backend: asymmetric embeddings plus a type-partitioned vector
//! index, expressed as injectable capability traits. The matching pipeline
//! treats the whole backend as optional — when it is absent or failing, the
//! rule-based path serves every request.

pub mod embedding;
pub mod handlers;
pub mod program_text;
pub mod qdrant;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::program::{ProgramItem, ProgramType};

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("embedding response contained no vectors")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("payload decode error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Asymmetric embedding mode: profiles embed as queries, catalog entries as
/// passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingMode {
    Query,
    Passage,
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str, mode: EmbeddingMode) -> Result<Vec<f32>, EmbeddingError>;
}

/// A vector hit: the stored program and its similarity score.
#[derive(Debug, Clone)]
pub struct ScoredProgram {
    pub program: ProgramItem,
    pub score: f32,
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Creates the collection when missing. Idempotent.
    async fn ensure_collection(&self) -> Result<(), RetrievalError>;

    /// Stores one program with its passage vector and the text it was
    /// embedded from.
    async fn upsert(
        &self,
        program: &ProgramItem,
        vector: Vec<f32>,
        text_content: &str,
    ) -> Result<(), RetrievalError>;

    /// Similarity search restricted to one program type. Called once per
    /// type so every category keeps representation.
    async fn search(
        &self,
        vector: &[f32],
        program_type: ProgramType,
        limit: usize,
    ) -> Result<Vec<ScoredProgram>, RetrievalError>;
}

/// The injected pair of capabilities the RAG path needs.
#[derive(Clone)]
pub struct RetrievalBackend {
    pub embedder: Arc<dyn Embedder>,
    pub index: Arc<dyn VectorIndex>,
}
