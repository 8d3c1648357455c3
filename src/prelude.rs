//! Convenience re-exports for common use.

pub use crate::agent::{Agent, AgentBuilder, Attachment, ChatInput, ContextProvider, Conversation};
pub use crate::audio::{OpenAiTranscriber, Transcriber};
pub use crate::config::{AgentConfig, Provider};
pub use crate::error::{ColloquyError, Result};
pub use crate::provider::{ChatBackend, OpenAiChatBackend};
pub use crate::schema::OutputSchema;
pub use crate::tools::{FnTool, Tool, ToolArguments, ToolParameters};
pub use crate::types::{Message, ReasoningEffort, Role, Usage};
