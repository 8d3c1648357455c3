//! Backend connector: the chat completion transport seam.

pub mod http;
pub mod openai;

pub use openai::OpenAiChatBackend;

use async_trait::async_trait;

use crate::error::ColloquyError;
use crate::types::{ChatCompletion, ChatRequest};

/// A chat completion backend.
///
/// Implementations own transport concerns (auth, timeout, retry). The agent
/// only sees a completion record or a classified error.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Provider name (e.g., "openai", "deepseek").
    fn provider_name(&self) -> &str;

    /// Issue one chat completion request.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, ColloquyError>;
}
