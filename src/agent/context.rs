//! Hook for enriching user text before it is recorded.

use async_trait::async_trait;

use crate::error::ColloquyError;

/// Rewrites each plain user message before it enters the conversation.
///
/// Image-bearing messages are recorded as-is and never reach this hook.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    async fn augment(&self, message: String) -> Result<String, ColloquyError>;
}

/// Leaves messages untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

#[async_trait]
impl ContextProvider for NoContext {
    async fn augment(&self, message: String) -> Result<String, ColloquyError> {
        Ok(message)
    }
}
