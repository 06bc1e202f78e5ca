//! Test doubles for the flow's collaborators
//!
//! Public so integration tests and embedders can drive a `FlowController`
//! without a network or a real view stack.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::FlowConfig;
use crate::flow::{Navigator, Route};
use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};

/// One scripted model reply
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    delay: Duration,
    outcome: Result<String, String>,
}

impl ScriptedReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(content.into()),
        }
    }

    /// The call fails with an API error
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Err(message.into()),
        }
    }

    /// Resolve only after `delay`
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// LLM client that plays back a fixed script and records every request
///
/// Once the script runs out every call fails with a 503.
#[derive(Default)]
pub struct ScriptedLlmClient {
    script: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlmClient {
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Immediate text replies, in order
    pub fn replying(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| ScriptedReply::text(*t)))
    }

    /// Every call fails
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(messages = request.messages.len(), "ScriptedLlmClient::complete: called");
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        let next = self.script.lock().unwrap_or_else(|e| e.into_inner()).pop_front();

        let Some(reply) = next else {
            return Err(LlmError::ApiError {
                status: 503,
                message: "script exhausted".to_string(),
            });
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        match reply.outcome {
            Ok(text) => Ok(CompletionResponse::text(text)),
            Err(message) => Err(LlmError::ApiError { status: 500, message }),
        }
    }
}

/// Navigator that only remembers where it was sent
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// How many times the garden view was requested
    pub fn garden_visits(&self) -> usize {
        self.routes().iter().filter(|r| **r == Route::Garden).count()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        debug!(route = route.name(), "RecordingNavigator::navigate: called");
        self.routes.lock().unwrap_or_else(|e| e.into_inner()).push(route);
    }
}

/// Flow timings short enough for tests
pub fn quick_flow_config() -> FlowConfig {
    FlowConfig {
        display_delay_ms: 10,
        final_delay_ms: 20,
        ..FlowConfig::default()
    }
}
