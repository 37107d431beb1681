//! Unified error handling for text-gen-service.
//!
//! A single top-level [`TextGenError`] for the whole crate, with
//! configuration problems grouped in [`ConfigError`]. Small helpers for
//! reading/validating environment variables live here as well.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type TextGenResult<T> = Result<T, TextGenError>;

/// Top-level error for the text-gen-service crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TextGenError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Underlying HTTP transport error (DNS/connect/timeout/reset).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response from the completion endpoint.
    #[error("http status {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    /// Response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The API returned no choices to read a completion from.
    #[error("empty choices in completion response")]
    EmptyChoices,
}

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (limits, timeouts).
    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Endpoint was empty or did not start with http/https.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Reads a mandatory environment variable, rejecting empty values.
pub(crate) fn must_env(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

/// Reads an optional `u32` environment variable.
pub(crate) fn env_opt_u32(var: &'static str) -> Result<Option<u32>, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                var,
                reason: "expected u32",
            }),
        _ => Ok(None),
    }
}

/// Reads an optional `f32` environment variable.
pub(crate) fn env_opt_f32(var: &'static str) -> Result<Option<f32>, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<f32>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                var,
                reason: "expected f32",
            }),
        _ => Ok(None),
    }
}

/// Reads an optional `u64` environment variable.
pub(crate) fn env_opt_u64(var: &'static str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                var,
                reason: "expected u64",
            }),
        _ => Ok(None),
    }
}

/// First 300 chars of an error body, newlines flattened, for log lines.
pub(crate) fn make_snippet(body: &str) -> String {
    let flat = body.replace(['\n', '\r'], " ");
    flat.chars().take(300).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_flattens_and_truncates() {
        let body = "line one\nline two\r\nline three";
        assert_eq!(make_snippet(body), "line one line two  line three");

        let long = "x".repeat(400);
        assert_eq!(make_snippet(&long).chars().count(), 300);
    }
}
