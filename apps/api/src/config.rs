use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails fast at startup if required variables are missing; the retrieval
/// stack is optional and only wired up when `UPSTAGE_API_KEY` is present.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_llm_model: String,
    pub upstage_api_key: Option<String>,
    pub qdrant_url: String,
    pub qdrant_api_key: Option<String>,
    pub qdrant_collection: String,
    pub default_region: String,
    pub data_dir: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_llm_model: env_or("OPENAI_LLM_MODEL", "gpt-5"),
            upstage_api_key: std::env::var("UPSTAGE_API_KEY").ok(),
            qdrant_url: env_or("QDRANT_URL", "http://localhost:6333"),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok(),
            qdrant_collection: env_or("QDRANT_COLLECTION", "busg_programs"),
            default_region: env_or("DEFAULT_REGION", "부산"),
            data_dir: env_or("DATA_DIR", "data"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
