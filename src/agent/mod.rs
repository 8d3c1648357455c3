//! Agent system: multi-turn conversations with tool execution.

#[allow(clippy::module_inception)]
pub mod agent;
pub mod context;
pub mod conversation;
pub mod input;

pub use agent::{Agent, AgentBuilder};
pub use context::{ContextProvider, NoContext};
pub use conversation::Conversation;
pub use input::{Attachment, AudioClip, ChatInput, InputMessage};
