//! Audio transcription trait.

use async_trait::async_trait;

use crate::error::ColloquyError;

/// Turns recorded speech into text before it enters the conversation.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe audio data. An empty transcript is a valid answer.
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String, ColloquyError>;
}
