//! Retrying LLM wrapper with exponential backoff.
//!
//! Only the narrative path is wrapped. The judge talks to the bare client so a
//! failed adjudication surfaces immediately.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{LlmError, LlmPort, LlmRequest, LlmResponse};

/// Retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 = single attempt)
    pub max_retries: u32,
    pub base_delay_ms: u64,
    /// Cap on the exponential delay
    pub max_delay_ms: u64,
    /// Fraction (0.0-1.0) of the delay randomized either way
    pub jitter_factor: f64,
}

impl RetryConfig {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 8000,
            jitter_factor: 0.2,
        }
    }
}

/// Adds retry logic to any LLM client
pub struct ResilientLlmClient {
    inner: Arc<dyn LlmPort>,
    config: RetryConfig,
}

impl ResilientLlmClient {
    pub fn new(inner: Arc<dyn LlmPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// `base * 2^(attempt-1)`, capped, plus jitter.
    fn calculate_delay(&self, attempt: u32) -> u64 {
        let base = self.config.base_delay_ms;
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }

    /// Client errors (4xx other than 429) will fail the same way again.
    fn is_retryable(error: &LlmError) -> bool {
        match error {
            LlmError::RequestFailed(msg) => {
                let status = msg.split_whitespace().next().unwrap_or_default();
                !(status.starts_with('4') && status.len() == 3 && status != "429")
            }
            LlmError::InvalidResponse(_) => true,
        }
    }
}

#[async_trait]
impl LlmPort for ResilientLlmClient {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let mut attempt = 0;
        loop {
            let error = match self.inner.generate(request.clone()).await {
                Ok(response) => {
                    if attempt > 0 {
                        tracing::info!(attempt = attempt + 1, "LLM request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) => e,
            };

            if !Self::is_retryable(&error) {
                tracing::error!(error = %error, "LLM request failed with non-retryable error");
                return Err(error);
            }
            if attempt >= self.config.max_retries {
                tracing::error!(
                    attempts = attempt + 1,
                    error = %error,
                    "LLM request failed after all retry attempts"
                );
                return Err(error);
            }

            attempt += 1;
            let delay = self.calculate_delay(attempt);
            tracing::warn!(
                attempt,
                max_retries = self.config.max_retries,
                delay_ms = delay,
                error = %error,
                "LLM request failed, retrying"
            );
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{FinishReason, MockLlmPort};
    use mockall::Sequence;

    fn fast(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 5,
            jitter_factor: 0.0,
        }
    }

    fn ok(content: &str) -> Result<LlmResponse, LlmError> {
        Ok(LlmResponse {
            content: content.to_string(),
            finish_reason: FinishReason::Stop,
            usage: None,
        })
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let mut llm = MockLlmPort::new();
        let mut seq = Sequence::new();
        llm.expect_generate()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|_| Err(LlmError::RequestFailed("connection reset".into())));
        llm.expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| ok("fine"));

        let client = ResilientLlmClient::new(Arc::new(llm), fast(2));
        let response = client.generate(LlmRequest::new(vec![])).await.unwrap();
        assert_eq!(response.content, "fine");
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(3)
            .returning(|_| Err(LlmError::InvalidResponse("truncated".into())));

        let client = ResilientLlmClient::new(Arc::new(llm), fast(2));
        assert!(client.generate(LlmRequest::new(vec![])).await.is_err());
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(1)
            .returning(|_| Err(LlmError::RequestFailed("401 Unauthorized: bad key".into())));

        let client = ResilientLlmClient::new(Arc::new(llm), fast(3));
        assert!(client.generate(LlmRequest::new(vec![])).await.is_err());
    }

    #[test]
    fn test_rate_limit_and_server_errors_are_retryable() {
        assert!(ResilientLlmClient::is_retryable(&LlmError::RequestFailed(
            "429 Too Many Requests: slow down".into()
        )));
        assert!(ResilientLlmClient::is_retryable(&LlmError::RequestFailed(
            "503 Service Unavailable: busy".into()
        )));
        assert!(!ResilientLlmClient::is_retryable(&LlmError::RequestFailed(
            "400 Bad Request: nope".into()
        )));
    }

    #[test]
    fn test_backoff_doubles_until_capped() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay_ms: 500,
            max_delay_ms: 3000,
            jitter_factor: 0.0,
        };
        let client = ResilientLlmClient::new(Arc::new(MockLlmPort::new()), config);
        assert_eq!(client.calculate_delay(1), 500);
        assert_eq!(client.calculate_delay(2), 1000);
        assert_eq!(client.calculate_delay(3), 2000);
        assert_eq!(client.calculate_delay(4), 3000);
    }
}
