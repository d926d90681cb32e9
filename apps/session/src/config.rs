use std::time::Duration;

use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the auth backend, without trailing slash.
    pub api_url: String,
    /// Attached as `Authorization: Bearer ...` to every request when set.
    pub bearer_token: Option<String>,
    pub request_timeout: Duration,
    /// Upper bound for the whole boot-time session resolution.
    pub bootstrap_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: require_env("AUTH_API_URL")?.trim_end_matches('/').to_string(),
            bearer_token: std::env::var("AUTH_BEARER_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            request_timeout: Duration::from_secs(secs_env("REQUEST_TIMEOUT_SECS", 10)?),
            bootstrap_timeout: Duration::from_secs(secs_env("BOOTSTRAP_TIMEOUT_SECS", 15)?),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn secs_env(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds")),
        Err(_) => Ok(default),
    }
}
