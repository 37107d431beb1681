//! OpenAI-compatible text generation for the review pipeline.
//!
//! One thin, non-streaming client around `/v1/chat/completions`, configured
//! strictly from environment variables. Errors are normalized into
//! [`TextGenError`] so the caller can treat any per-file provider hiccup as
//! a soft failure and keep processing the remaining files.

mod client;
pub mod config;
mod errors;

pub use client::TextGenClient;
pub use config::TextGenConfig;
pub use errors::{ConfigError, TextGenError, TextGenResult};
