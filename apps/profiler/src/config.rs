use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::errors::AppError;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "llama3";
pub const DEFAULT_TEMPLATE_PATH: &str = "JSON_Template/json_template.json";
pub const DEFAULT_OUTPUT_DIR: &str = "Output";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Process configuration, built once at startup and passed by reference.
///
/// Nothing below `main` reads the environment; every component receives the
/// values it needs from here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Only the store-backed commands need a database.
    pub database_url: Option<String>,
    pub ollama_url: String,
    pub model: String,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match std::env::var("LLM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            database_url: std::env::var("DATABASE_URL").ok(),
            ollama_url: env_or("OLLAMA_URL", DEFAULT_OLLAMA_URL),
            model: env_or("OLLAMA_MODEL", DEFAULT_MODEL),
            template_path: PathBuf::from(env_or("TEMPLATE_PATH", DEFAULT_TEMPLATE_PATH)),
            output_dir: PathBuf::from(env_or("OUTPUT_DIR", DEFAULT_OUTPUT_DIR)),
            request_timeout: Duration::from_secs(timeout_secs),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Returns the database URL or a configuration error naming the missing variable.
    pub fn require_database_url(&self) -> Result<&str, AppError> {
        self.database_url.as_deref().ok_or_else(|| {
            AppError::Config("Required environment variable 'DATABASE_URL' is not set".to_string())
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: None,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rust_log: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_database_url_is_config_error() {
        let config = Config::default();
        assert!(matches!(
            config.require_database_url(),
            Err(AppError::Config(msg)) if msg.contains("DATABASE_URL")
        ));
    }

    #[test]
    fn test_database_url_returned_when_present() {
        let config = Config {
            database_url: Some("postgres://localhost/jobs".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.require_database_url().unwrap(),
            "postgres://localhost/jobs"
        );
    }

    #[test]
    fn test_defaults_point_at_local_ollama() {
        let config = Config::default();
        assert_eq!(config.ollama_url, DEFAULT_OLLAMA_URL);
        assert_eq!(config.model, "llama3");
        assert_eq!(config.request_timeout, Duration::from_secs(120));
    }
}
