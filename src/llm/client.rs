//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call carries its whole context
///
/// The model has no memory outside the transcript it is given, so callers
/// resend the full conversation on every request.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single completion request and wait for the reply
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    /// Mock LLM client for unit tests
    pub struct MockLlmClient {
        responses: Vec<Result<CompletionResponse, String>>,
        call_count: AtomicUsize,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<CompletionResponse>) -> Self {
            debug!(response_count = %responses.len(), "MockLlmClient::new: called");
            Self {
                responses: responses.into_iter().map(Ok).collect(),
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Every call fails with an API error
        pub fn failing() -> Self {
            Self {
                responses: Vec::new(),
                call_count: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            debug!("MockLlmClient::complete: called");
            self.requests.lock().unwrap().push(request);
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(idx) {
                Some(Ok(resp)) => Ok(resp.clone()),
                Some(Err(msg)) => Err(LlmError::InvalidResponse(msg.clone())),
                None => Err(LlmError::ApiError {
                    status: 503,
                    message: "No more mock responses".to_string(),
                }),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::transcript::Turn;

        #[tokio::test]
        async fn test_mock_client_returns_responses() {
            let client = MockLlmClient::new(vec![
                CompletionResponse::text("Response 1"),
                CompletionResponse::text("Response 2"),
            ]);

            let req = CompletionRequest::new(vec![Turn::system("Test")], 100, 0.7);

            let resp1 = client.complete(req.clone()).await.unwrap();
            assert_eq!(resp1.content, Some("Response 1".to_string()));

            let resp2 = client.complete(req).await.unwrap();
            assert_eq!(resp2.content, Some("Response 2".to_string()));

            assert_eq!(client.call_count(), 2);
            assert_eq!(client.requests().len(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::failing();
            let req = CompletionRequest::new(vec![], 100, 0.7);

            assert!(client.complete(req).await.is_err());
            assert_eq!(client.call_count(), 1);
        }
    }
}
