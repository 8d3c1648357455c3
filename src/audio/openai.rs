//! OpenAI-compatible Whisper transcription (`/audio/transcriptions`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use super::helpers::{build_transcription_multipart, extension_for_mime, normalize_mime_type};
use super::transcription::Transcriber;
use crate::config::{AgentConfig, DEFAULT_REQUEST_TIMEOUT, DEFAULT_TRANSCRIPTION_MODEL};
use crate::error::ColloquyError;
use crate::provider::http::{auth_headers, endpoint, shared_client, status_to_error};
use crate::util::retry::RetryPolicy;

/// Whisper-style transcriber posting multipart audio.
///
/// Not retried by default; opt in with [`OpenAiTranscriber::with_retry_policy`].
#[derive(Debug, Clone)]
pub struct OpenAiTranscriber {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl OpenAiTranscriber {
    pub fn new_with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            retry_policy: RetryPolicy::none(),
        }
    }

    /// Key, transcription model and transcription endpoint from config.
    ///
    /// The chat provider's `base_url` is not consulted.
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new_with_base_url(config.api_key.clone(), config.resolved_transcription_base_url())
            .with_model(config.transcription_model.clone())
            .with_timeout(config.request_timeout)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn validate_inputs(&self, audio: &[u8], mime_type: &str) -> Result<String, ColloquyError> {
        if self.model.trim().is_empty() {
            return Err(ColloquyError::InvalidArgument(
                "Transcription model cannot be empty".to_string(),
            ));
        }
        if audio.is_empty() {
            return Err(ColloquyError::InvalidArgument(
                "Audio payload cannot be empty".to_string(),
            ));
        }
        let normalized = normalize_mime_type(mime_type).ok_or_else(|| {
            ColloquyError::InvalidArgument("MIME type cannot be empty".to_string())
        })?;
        if extension_for_mime(&normalized).is_none() {
            return Err(ColloquyError::InvalidArgument(format!(
                "Unsupported transcription MIME type: {normalized}"
            )));
        }
        Ok(normalized)
    }

    async fn transcribe_once(&self, audio: &[u8], mime_type: &str) -> Result<String, ColloquyError> {
        let extension = extension_for_mime(mime_type).unwrap_or("bin");
        let boundary = format!("colloquy-{}", Uuid::new_v4().simple());
        let body = build_transcription_multipart(&boundary, &self.model, audio, mime_type, extension);

        let mut headers = auth_headers(&self.api_key);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&format!("multipart/form-data; boundary={boundary}")).map_err(
                |e| ColloquyError::InvalidArgument(format!("Failed to build multipart content-type: {e}")),
            )?,
        );

        let resp = shared_client()
            .post(endpoint(&self.base_url, "audio/transcriptions"))
            .headers(headers)
            .timeout(self.timeout)
            .body(body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;
        if !(200..300).contains(&status) {
            return Err(status_to_error(status, &text));
        }
        parse_transcription_body(&text)
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, ColloquyError> {
        let mime_type = self.validate_inputs(audio, mime_type)?;
        debug!(
            model = self.model.as_str(),
            bytes = audio.len(),
            mime_type = mime_type.as_str(),
            "Transcribing audio"
        );
        self.retry_policy
            .execute(|| self.transcribe_once(audio, &mime_type))
            .await
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: Option<String>,
}

/// Missing or null `text` means nothing was said.
fn parse_transcription_body(body: &str) -> Result<String, ColloquyError> {
    let parsed: TranscriptionResponse = serde_json::from_str(body)
        .map_err(|e| ColloquyError::Transcription(format!("Unreadable transcription response: {e}")))?;
    Ok(parsed.text.unwrap_or_default())
}
