// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! AI API keys are optional: without them the advisory endpoints return an
//! explicit "not configured" error while everything else keeps working.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Root directory for snapshot and record storage
    pub data_dir: PathBuf,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Anthropic API key for meal nutrition estimation (optional)
    pub anthropic_api_key: Option<String>,
    /// Gemini API key for body-composition photo analysis (optional)
    pub gemini_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            anthropic_api_key: env::var("ANTHROPIC_API_KEY")
                .ok()
                .map(|v| v.trim().to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().map(|v| v.trim().to_string()),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            anthropic_api_key: None,
            gemini_api_key: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
