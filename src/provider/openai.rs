//! OpenAI-compatible Chat Completions backend.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::config::AgentConfig;
use crate::error::ColloquyError;
use crate::types::{ChatCompletion, ChatRequest};
use crate::util::retry::RetryPolicy;

use super::http::{bearer_headers, endpoint, shared_client, status_to_error};
use super::ChatBackend;

pub struct OpenAiChatBackend {
    provider: String,
    api_key: String,
    base_url: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl OpenAiChatBackend {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: crate::config::DEFAULT_REQUEST_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Build from the agent config: endpoint, key, timeout and retry budget.
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            provider: config.provider.to_string(),
            api_key: config.api_key.clone(),
            base_url: config.resolved_base_url().to_string(),
            timeout: config.request_timeout,
            retry_policy: RetryPolicy::from(config),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    async fn complete_once(
        &self,
        url: &str,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, ColloquyError> {
        let resp = shared_client()
            .post(url)
            .headers(bearer_headers(&self.api_key))
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        if !(200..300).contains(&status) {
            return Err(status_to_error(status, &body));
        }

        ChatCompletion::from_body(&body)
            .map_err(|message| ColloquyError::response_validation(message, body))
    }
}

#[async_trait]
impl ChatBackend for OpenAiChatBackend {
    fn provider_name(&self) -> &str {
        &self.provider
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ColloquyError> {
        let url = endpoint(&self.base_url, "chat/completions");
        debug!(
            provider = self.provider.as_str(),
            model = request.model.as_str(),
            "  >>>  Request:  {}",
            pretty(request)
        );

        let completion = self
            .retry_policy
            .execute(|| self.complete_once(&url, request))
            .await
            .map_err(|e| {
                log_request_error(request, &e);
                e
            })?;

        debug!("  >>>  Response:  {}", pretty(&completion));
        Ok(completion)
    }
}

fn pretty<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

fn log_request_error(request: &ChatRequest, err: &ColloquyError) {
    error!(error = %err, "  >>>  Request Error:  {}", pretty(request));
    match err {
        ColloquyError::Api { message, .. } => debug!("{message}"),
        ColloquyError::ResponseValidation { body, .. } => debug!("{body}"),
        _ => {}
    }
}
