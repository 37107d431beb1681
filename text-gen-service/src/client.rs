//! Thin client for OpenAI-compatible chat completion APIs.
//!
//! Endpoint derived from [`TextGenConfig::endpoint`]:
//! - POST {endpoint}/v1/chat/completions — chat completion (non-streaming)
//!
//! Constructor validation:
//! - `cfg.api_key` must be non-empty
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::TextGenConfig;
use crate::errors::{ConfigError, TextGenError, make_snippet};

/// Preconfigured HTTP client for one completion backend.
///
/// Construct once per job and reuse; the underlying `reqwest::Client` keeps
/// its connection pool and default headers across calls.
#[derive(Debug)]
pub struct TextGenClient {
    client: reqwest::Client,
    cfg: TextGenConfig,
    url_chat: String,
}

impl TextGenClient {
    /// Creates a new client from the given config.
    ///
    /// # Errors
    /// - [`TextGenError::Config`] with `InvalidEndpoint` for a bad endpoint scheme
    /// - [`TextGenError::Config`] with `MissingVar` when the API key is empty
    /// - [`TextGenError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: TextGenConfig) -> Result<Self, TextGenError> {
        if cfg.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar("LLM_API_KEY").into());
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ConfigError::InvalidEndpoint(cfg.endpoint.clone()).into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", cfg.api_key)).map_err(|e| {
                TextGenError::Decode(format!("invalid API key header: {e}"))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{}/v1/chat/completions", base);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = cfg.timeout_secs.unwrap_or(60),
            "TextGenClient initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
        })
    }

    /// Performs a **non-streaming** chat completion request.
    ///
    /// The `messages` array holds an optional system message followed by the
    /// user `prompt`. Mapped options from config: `model`, `temperature`,
    /// `max_tokens`.
    ///
    /// # Errors
    /// - [`TextGenError::HttpStatus`] for non-2xx responses
    /// - [`TextGenError::Transport`] for client/network failures
    /// - [`TextGenError::Decode`] if the JSON cannot be parsed
    /// - [`TextGenError::EmptyChoices`] if no choices are returned
    pub async fn complete(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, TextGenError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt, system);

        debug!(
            model = %self.cfg.model,
            prompt_len = prompt.len(),
            has_system = system.is_some(),
            "POST {}", self.url_chat
        );

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );

            return Err(TextGenError::HttpStatus {
                status,
                url,
                snippet,
            });
        }

        let out: ChatCompletionResponse = match resp.json().await {
            Ok(v) => v,
            Err(e) => {
                error!(
                    error = %e,
                    model = %self.cfg.model,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode chat completion response"
                );
                return Err(TextGenError::Decode(format!(
                    "serde error: {e}; expected `choices[0].message.content`"
                )));
            }
        };

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or(TextGenError::EmptyChoices)?;

        info!(
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            reply_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// Builds a minimal chat request from config, `prompt`, and an optional
    /// system message.
    fn from_cfg(cfg: &'a TextGenConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        }
    }
}

/// Chat message for the completion API.
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Minimal response for `/v1/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cfg() -> TextGenConfig {
        TextGenConfig {
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.com".to_string(),
            api_key: "sk-test".to_string(),
            max_tokens: None,
            temperature: Some(0.2),
            timeout_secs: Some(30),
        }
    }

    #[test]
    fn request_includes_system_before_user() {
        let cfg = test_cfg();
        let req = ChatCompletionRequest::from_cfg(&cfg, "hello", Some("be brief"));
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, "system");
        assert_eq!(req.messages[0].content, "be brief");
        assert_eq!(req.messages[1].role, "user");
        assert_eq!(req.messages[1].content, "hello");
    }

    #[test]
    fn unset_options_are_omitted_from_the_payload() {
        let cfg = test_cfg();
        let req = ChatCompletionRequest::from_cfg(&cfg, "hello", None);
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("max_tokens").is_none());
        assert_eq!(value["temperature"], serde_json::json!(0.2f32));
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn bad_endpoint_scheme_is_rejected() {
        let mut cfg = test_cfg();
        cfg.endpoint = "ftp://example.com".to_string();
        let err = TextGenClient::new(cfg).unwrap_err();
        assert!(matches!(
            err,
            TextGenError::Config(ConfigError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn response_decoding_reads_first_present_content() {
        let raw = r#"{"choices":[{"message":{"content":null}},{"message":{"content":"ok"}}]}"#;
        let resp: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let content = resp.choices.into_iter().find_map(|c| c.message.content);
        assert_eq!(content.as_deref(), Some("ok"));
    }
}
