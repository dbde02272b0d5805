use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every value has a default so the portal starts against a local backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub frontend_dir: String,
    pub http_timeout_secs: u64,
    pub catalog_limit: usize,
    pub stats_concurrency: usize,
    pub search_debounce_ms: u64,
    pub session_idle_secs: u64,
    pub match_model: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: env_or("API_BASE_URL", "http://localhost:9990"),
            port: parse_env("PORT", 8000)?,
            rust_log: env_or("RUST_LOG", "info"),
            frontend_dir: env_or("FRONTEND_DIR", "frontend"),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", 30)?,
            catalog_limit: parse_env("CATALOG_LIMIT", 1000)?,
            stats_concurrency: parse_env::<usize>("STATS_CONCURRENCY", 8)?.max(1),
            search_debounce_ms: parse_env("SEARCH_DEBOUNCE_MS", 500)?,
            session_idle_secs: parse_env::<u64>("SESSION_IDLE_SECS", 1800)?.max(1),
            match_model: env_or("MATCH_MODEL", "gemini-2.0-flash-exp"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
