//! Application configuration loaded from environment variables.
//!
//! The API key is hashed once at startup; only the hash is kept in memory.

use sha2::{Digest, Sha256};
use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// SHA-256 hash of the client API key
    pub api_key_hash: Vec<u8>,
    /// Origin allowed by CORS in addition to localhost
    pub allowed_origin: String,
    /// Optional JSON snapshot file for the store
    pub snapshot_path: Option<PathBuf>,
    /// Largest suggestion batch a single request may ask for
    pub max_suggestion_batch: usize,
    /// Largest bench-model auto-run a single request may ask for
    pub max_autorun_trials: usize,
}

/// Hash an API key the way the auth middleware does.
pub fn hash_api_key(key: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.finalize().to_vec()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            api_key_hash: env::var("PLANNER_API_KEY")
                .map(|v| hash_api_key(v.trim()))
                .map_err(|_| ConfigError::Missing("PLANNER_API_KEY"))?,
            allowed_origin: env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            snapshot_path: env::var("SNAPSHOT_PATH").ok().map(PathBuf::from),
            max_suggestion_batch: parse_limit("MAX_SUGGESTION_BATCH", 10)?,
            max_autorun_trials: parse_limit("MAX_AUTORUN_TRIALS", 100)?,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            api_key_hash: hash_api_key("test-api-key"),
            allowed_origin: "http://localhost:5173".to_string(),
            snapshot_path: None,
            max_suggestion_batch: 10,
            max_autorun_trials: 100,
        }
    }
}

fn parse_limit(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => {
            let value: usize = raw.parse().map_err(|_| ConfigError::Invalid(name))?;
            if value == 0 {
                return Err(ConfigError::Invalid(name));
            }
            Ok(value)
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
