//! Chat completion response records.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::message::Message;

/// One backend response. Only the first choice is consumed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletion {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
}

impl ChatCompletion {
    pub const OBJECT: &'static str = "chat.completion";

    /// Parse and validate a raw response body.
    ///
    /// Fails when the body is not a completion, the `object` literal is wrong,
    /// or there are no choices.
    pub fn from_body(body: &str) -> Result<Self, String> {
        let completion: Self = serde_json::from_str(body).map_err(|e| e.to_string())?;
        if completion.object != Self::OBJECT {
            return Err(format!(
                "expected object '{}', got '{}'",
                Self::OBJECT,
                completion.object
            ));
        }
        if completion.choices.is_empty() {
            return Err("completion has no choices".to_string());
        }
        Ok(completion)
    }

    /// The first choice's message.
    pub fn first_message(&self) -> Option<&Message> {
        self.choices.first().map(|choice| &choice.message)
    }

    pub fn into_first_message(self) -> Option<Message> {
        self.choices.into_iter().next().map(|choice| choice.message)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    pub index: u32,
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<serde_json::Value>,
    pub finish_reason: String,
}

impl Choice {
    pub fn finish(&self) -> Option<FinishReason> {
        self.finish_reason.parse().ok()
    }
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    FunctionCall,
}

/// Token usage for a completion.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<PromptTokensDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PromptTokensDetails {
    #[serde(default)]
    pub cached_tokens: u64,
    #[serde(default)]
    pub audio_tokens: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CompletionTokensDetails {
    #[serde(default)]
    pub reasoning_tokens: u64,
    #[serde(default)]
    pub audio_tokens: u64,
    #[serde(default)]
    pub accepted_prediction_tokens: u64,
    #[serde(default)]
    pub rejected_prediction_tokens: u64,
}

impl Usage {
    /// Merge another usage into this one (accumulate).
    pub fn merge(&mut self, other: &Usage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
        if let Some(ref d) = other.prompt_tokens_details {
            let mine = self.prompt_tokens_details.get_or_insert_with(Default::default);
            mine.cached_tokens += d.cached_tokens;
            mine.audio_tokens += d.audio_tokens;
        }
        if let Some(ref d) = other.completion_tokens_details {
            let mine = self
                .completion_tokens_details
                .get_or_insert_with(Default::default);
            mine.reasoning_tokens += d.reasoning_tokens;
            mine.audio_tokens += d.audio_tokens;
            mine.accepted_prediction_tokens += d.accepted_prediction_tokens;
            mine.rejected_prediction_tokens += d.rejected_prediction_tokens;
        }
    }

    pub fn cached_tokens(&self) -> u64 {
        self.prompt_tokens_details
            .as_ref()
            .map_or(0, |d| d.cached_tokens)
    }

    pub fn reasoning_tokens(&self) -> u64 {
        self.completion_tokens_details
            .as_ref()
            .map_or(0, |d| d.reasoning_tokens)
    }
}

/// Error body returned by the backend on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// Best-effort parse: the backend message, or `None` if the body has another shape.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .map(|parsed| parsed.error.message)
    }
}
