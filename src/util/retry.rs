//! Fixed-delay retry for backend calls.

use std::future::Future;
use std::time::Duration;

use crate::config::AgentConfig;
use crate::error::ColloquyError;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: crate::config::DEFAULT_MAX_RETRIES,
            delay: crate::config::DEFAULT_RETRY_DELAY,
        }
    }
}

impl From<&AgentConfig> for RetryPolicy {
    fn from(config: &AgentConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: config.retry_delay,
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// Execute an async operation, retrying errors that report themselves retryable.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, ColloquyError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ColloquyError>>,
    {
        let mut retries = 0;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if !e.is_retryable() || retries >= self.max_retries {
                        return Err(e);
                    }
                    retries += 1;

                    match &e {
                        ColloquyError::ResponseValidation { .. } => tracing::warn!(
                            retry = retries,
                            max_retries = self.max_retries,
                            "Validation failed, retrying ({retries}/{})...",
                            self.max_retries
                        ),
                        _ => tracing::warn!(
                            retry = retries,
                            max_retries = self.max_retries,
                            status = e.status(),
                            "Request failed, retrying ({retries}/{})...",
                            self.max_retries
                        ),
                    }

                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}
