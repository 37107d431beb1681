//! Completion backend configuration loaded strictly from environment
//! variables.
//!
//! # Environment variables
//!
//! - `LLM_MODEL`        — model identifier, e.g. `gpt-4o-mini` (required)
//! - `LLM_API_KEY`      — bearer token for the API (required)
//! - `LLM_ENDPOINT`     — API base, default `https://api.openai.com`
//! - `LLM_MAX_TOKENS`   — optional completion cap (u32)
//! - `LLM_TEMPERATURE`  — optional sampling temperature (f32)
//! - `LLM_TIMEOUT_SECS` — optional request timeout, default 60

use crate::errors::{ConfigError, env_opt_f32, env_opt_u32, env_opt_u64, must_env};

/// Parameters for one completion backend.
#[derive(Debug, Clone)]
pub struct TextGenConfig {
    /// Model identifier string.
    pub model: String,

    /// API base URL (the `/v1/...` path is appended by the client).
    pub endpoint: String,

    /// Bearer token used for authentication.
    pub api_key: String,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl TextGenConfig {
    /// Builds the config from the process environment.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] when `LLM_MODEL` or `LLM_API_KEY` is absent
    /// - [`ConfigError::InvalidNumber`] when an optional numeric value fails to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        let model = must_env("LLM_MODEL")?;
        let api_key = must_env("LLM_API_KEY")?;
        let endpoint = std::env::var("LLM_ENDPOINT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        Ok(Self {
            model,
            endpoint,
            api_key,
            max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
            temperature: env_opt_f32("LLM_TEMPERATURE")?,
            timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?,
        })
    }
}
