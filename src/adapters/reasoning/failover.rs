//! Failover Reasoning Client - retry and model fallback over a raw backend.
//!
//! Wraps a [`ReasoningBackend`] with an ordered list of model identifiers.
//! Quota-class errors advance to the next model immediately; other errors
//! retry the same model with exponential backoff. The current model index
//! is sticky: once degraded to a later model, subsequent calls start there
//! until [`reset`](FailoverReasoningClient::reset) or a full fallback cycle
//! returns to the head of the list.
//!
//! # Example
//!
//! ```ignore
//! let backend = GeminiBackend::new(GeminiConfig::new(api_key))?;
//! let client = FailoverReasoningClient::new(
//!     Arc::new(backend),
//!     vec!["gemini-2.0-flash-exp".into(), "gemini-2.5-pro".into()],
//! );
//! let answer = client.complete("plan a trip", &GenerationOptions::default()).await?;
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::domain::foundation::truncate;
use crate::ports::{CompletionClient, GenerationOptions, ReasoningBackend, ReasoningError};

/// Default backoff base delay.
const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default retry ceiling.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Resilient reasoning client with model fallback.
pub struct FailoverReasoningClient {
    backend: Arc<dyn ReasoningBackend>,
    models: Vec<String>,
    current: AtomicUsize,
    base_delay: Duration,
    max_retries: u32,
}

impl FailoverReasoningClient {
    /// Creates a client over the given backend and ordered model list.
    ///
    /// The list must contain at least one model; an empty list makes every
    /// call fail with `Exhausted`.
    pub fn new(backend: Arc<dyn ReasoningBackend>, models: Vec<String>) -> Self {
        Self {
            backend,
            models,
            current: AtomicUsize::new(0),
            base_delay: DEFAULT_BASE_DELAY,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets the backoff base delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Sets the retry ceiling.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Returns the model the next call will try first.
    pub fn current_model(&self) -> &str {
        let index = self.current.load(Ordering::SeqCst).min(
            self.models.len().saturating_sub(1),
        );
        self.models.get(index).map(String::as_str).unwrap_or("")
    }

    /// Returns to the first model in the list.
    pub fn reset(&self) {
        self.current.store(0, Ordering::SeqCst);
    }

    /// Wait time for a 0-indexed attempt: `base_delay * 2^attempt`.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

#[async_trait]
impl CompletionClient for FailoverReasoningClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, ReasoningError> {
        if self.models.is_empty() {
            return Err(ReasoningError::Exhausted { attempts: 0 });
        }

        let mut attempt: u32 = 0;
        loop {
            let index = self
                .current
                .load(Ordering::SeqCst)
                .min(self.models.len() - 1);
            let model = &self.models[index];

            match self.backend.generate(model, prompt, options).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_quota() => {
                    warn!(
                        model = %model,
                        attempt,
                        error = %truncate(&err.to_string(), 120),
                        "reasoning model hit quota limit"
                    );
                    if index + 1 < self.models.len() {
                        // Next model, same turn, no delay.
                        self.current.store(index + 1, Ordering::SeqCst);
                    } else {
                        if attempt >= self.max_retries {
                            return Err(ReasoningError::Exhausted {
                                attempts: attempt + 1,
                            });
                        }
                        sleep(self.backoff_delay(attempt)).await;
                        attempt += 1;
                        self.current.store(0, Ordering::SeqCst);
                    }
                }
                Err(err) => {
                    warn!(
                        model = %model,
                        attempt,
                        error = %truncate(&err.to_string(), 120),
                        "reasoning request failed"
                    );
                    if attempt >= self.max_retries {
                        return Err(ReasoningError::Exhausted {
                            attempts: attempt + 1,
                        });
                    }
                    sleep(self.backoff_delay(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::reasoning::{MockReasoningBackend, MockReasoningError};
    use std::time::Instant;

    fn client(backend: &MockReasoningBackend, models: &[&str]) -> FailoverReasoningClient {
        FailoverReasoningClient::new(
            Arc::new(backend.clone()),
            models.iter().map(|m| m.to_string()).collect(),
        )
        .with_base_delay(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn success_on_first_model() {
        let backend = MockReasoningBackend::new().with_response("hello");
        let provider = client(&backend, &["model-a", "model-b"]);

        let result = provider
            .complete("hi", &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(result, "hello");
        assert_eq!(backend.models_called(), vec!["model-a"]);
    }

    #[tokio::test]
    async fn quota_switches_to_next_model_without_delay() {
        let backend = MockReasoningBackend::new()
            .with_error(MockReasoningError::Quota)
            .with_response("from b");
        // A long base delay would make an accidental backoff visible.
        let provider = FailoverReasoningClient::new(
            Arc::new(backend.clone()),
            vec!["model-a".to_string(), "model-b".to_string()],
        )
        .with_base_delay(Duration::from_secs(30));

        let start = Instant::now();
        let result = provider
            .complete("hi", &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(result, "from b");
        assert_eq!(backend.models_called(), vec!["model-a", "model-b"]);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn degradation_is_sticky_across_calls() {
        let backend = MockReasoningBackend::new()
            .with_error(MockReasoningError::Quota)
            .with_response("first")
            .with_response("second");
        let provider = client(&backend, &["model-a", "model-b"]);

        provider
            .complete("one", &GenerationOptions::default())
            .await
            .unwrap();
        provider
            .complete("two", &GenerationOptions::default())
            .await
            .unwrap();

        // The second call starts on model-b without retrying model-a.
        assert_eq!(backend.models_called(), vec!["model-a", "model-b", "model-b"]);
    }

    #[tokio::test]
    async fn quota_on_last_model_backs_off_and_resets_to_first() {
        let backend = MockReasoningBackend::new()
            .with_error(MockReasoningError::Quota)
            .with_error(MockReasoningError::Quota)
            .with_response("recovered");
        let provider = client(&backend, &["model-a", "model-b"]);

        let result = provider
            .complete("hi", &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(result, "recovered");
        assert_eq!(
            backend.models_called(),
            vec!["model-a", "model-b", "model-a"]
        );
    }

    #[tokio::test]
    async fn transient_error_retries_same_model() {
        let backend = MockReasoningBackend::new()
            .with_error(MockReasoningError::Unavailable)
            .with_response("ok");
        let provider = client(&backend, &["model-a", "model-b"]);

        let result = provider
            .complete("hi", &GenerationOptions::default())
            .await
            .unwrap();

        assert_eq!(result, "ok");
        assert_eq!(backend.models_called(), vec!["model-a", "model-a"]);
    }

    #[tokio::test]
    async fn persistent_failure_exhausts() {
        let backend = MockReasoningBackend::new().with_default_error(MockReasoningError::Unavailable);
        let provider = client(&backend, &["model-a"]).with_max_retries(2);

        let result = provider.complete("hi", &GenerationOptions::default()).await;

        assert!(matches!(result, Err(ReasoningError::Exhausted { .. })));
        // Initial try plus two retries.
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn reset_returns_to_first_model() {
        let backend = MockReasoningBackend::new()
            .with_error(MockReasoningError::Quota)
            .with_response("x")
            .with_response("y");
        let provider = client(&backend, &["model-a", "model-b"]);

        provider
            .complete("one", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(provider.current_model(), "model-b");

        provider.reset();
        assert_eq!(provider.current_model(), "model-a");

        provider
            .complete("two", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(
            backend.models_called(),
            vec!["model-a", "model-b", "model-a"]
        );
    }

    #[tokio::test]
    async fn empty_model_list_is_exhausted() {
        let backend = MockReasoningBackend::new().with_response("unused");
        let provider = client(&backend, &[]);

        let result = provider.complete("hi", &GenerationOptions::default()).await;
        assert!(matches!(
            result,
            Err(ReasoningError::Exhausted { attempts: 0 })
        ));
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let backend = MockReasoningBackend::new();
        let provider = FailoverReasoningClient::new(Arc::new(backend), vec!["m".to_string()])
            .with_base_delay(Duration::from_secs(1));

        assert_eq!(provider.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(provider.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(provider.backoff_delay(2), Duration::from_secs(4));
    }
}
