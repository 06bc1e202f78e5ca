//! Fail-soft chat completion
//!
//! Wraps an [`LlmClient`] so the conversation flow always gets text back:
//! transport errors, API errors, malformed payloads and timeouts all become
//! a fixed apology.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::{CompletionRequest, LlmClient, LlmError, StopReason};
use crate::config::LlmConfig;
use crate::transcript::Turn;

/// Reply shown when the model cannot be reached
pub const FALLBACK_REPLY: &str = "Sorry, I'm unable to respond right now. Please try again later.";

/// Single request/response call against the remote model that never fails
#[derive(Clone)]
pub struct ChatCompletionClient {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
}

impl ChatCompletionClient {
    pub fn new(llm: Arc<dyn LlmClient>, max_tokens: u32, temperature: f32, timeout: Duration) -> Self {
        Self {
            llm,
            max_tokens,
            temperature,
            timeout,
        }
    }

    pub fn from_config(llm: Arc<dyn LlmClient>, config: &LlmConfig) -> Self {
        Self::new(llm, config.max_tokens, config.temperature, config.timeout())
    }

    /// Send the transcript and return the reply text, or [`FALLBACK_REPLY`]
    pub async fn complete(&self, transcript: &[Turn]) -> String {
        debug!(turns = transcript.len(), "complete: called");
        match self.try_complete(transcript).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "complete: chat completion failed, using fallback reply");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn try_complete(&self, transcript: &[Turn]) -> Result<String, LlmError> {
        let request = CompletionRequest::new(transcript.to_vec(), self.max_tokens, self.temperature);

        let response = tokio::time::timeout(self.timeout, self.llm.complete(request))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))??;

        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "try_complete: reply received"
        );
        if response.stop_reason == StopReason::MaxTokens {
            warn!("try_complete: reply was cut off at the token limit");
        }

        match response.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(LlmError::InvalidResponse("empty reply".to_string())),
        }
    }
}
