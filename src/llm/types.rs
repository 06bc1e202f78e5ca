//! LLM request/response types for HeartGarden
//!
//! Requests carry the full role-tagged transcript; providers translate it
//! into their own wire format.

use tracing::debug;

use crate::transcript::Turn;

/// A completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Full ordered transcript, system turn first
    pub messages: Vec<Turn>,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Turn>, max_tokens: u32, temperature: f32) -> Self {
        debug!(message_count = %messages.len(), %max_tokens, "CompletionRequest::new: called");
        Self {
            messages,
            max_tokens,
            temperature,
        }
    }
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// A plain text reply that ended normally
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ContentFilter,
}

impl StopReason {
    /// Parse from an OpenAI `finish_reason` string
    pub fn from_openai(s: Option<&str>) -> Self {
        debug!(?s, "StopReason::from_openai: called");
        match s {
            Some("length") => StopReason::MaxTokens,
            Some("content_filter") => StopReason::ContentFilter,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
