//! LLM Client module for HeartGarden
//!
//! Provides the provider client trait, the OpenAI implementation and the
//! fail-soft completion wrapper used by the conversation flow.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod completion;
mod error;
mod openai;
mod types;

pub use client::LlmClient;
pub use completion::{ChatCompletionClient, FALLBACK_REPLY};
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports the "openai" provider (any Chat Completions compatible endpoint).
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::Config(format!(
                "Unknown LLM provider: '{}'. Supported: openai",
                other
            )))
        }
    }
}
