//! The matching core: text normalization, heuristic scoring, candidate
//! filtering, re-ranking with fallback, and the pipeline that ties the
//! partitions together.

pub mod filters;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod rerank;
pub mod scoring;
pub mod text;
