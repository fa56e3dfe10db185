use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_MB: usize = 10;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means CVs and jobs are kept in memory only.
    pub database_url: Option<String>,
    pub gemini_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_upload_mb = match std::env::var("MAX_UPLOAD_MB") {
            Ok(v) => v
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?,
            Err(_) => DEFAULT_MAX_UPLOAD_MB,
        };

        Ok(Config {
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
