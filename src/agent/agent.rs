//! The agent: conversation state plus the request/tool/answer loop.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::audio::{OpenAiTranscriber, Transcriber};
use crate::config::AgentConfig;
use crate::error::{ColloquyError, Result};
use crate::provider::{ChatBackend, OpenAiChatBackend};
use crate::schema::{parse_structured, OutputSchema};
use crate::tools::{Tool, ToolArguments, ToolRegistry};
use crate::types::*;

use super::context::{ContextProvider, NoContext};
use super::conversation::Conversation;
use super::input::{ChatInput, InputMessage};

/// Which step of a turn a backend call belongs to.
#[derive(Debug, Clone)]
enum RequestPhase {
    /// Scripted reasoning prompt; tools are listed but may not be called.
    Thought,
    /// Normal call; the backend may request tools.
    Tools,
    /// Schema-constrained final answer.
    FinalSchema(ResponseFormat),
}

/// An agent that keeps a transcript and can call tools.
///
/// ```no_run
/// use colloquy::agent::Agent;
/// use colloquy::config::AgentConfig;
///
/// # async fn run() -> colloquy::error::Result<()> {
/// let mut agent = Agent::builder(AgentConfig::from_env()?)
///     .with_instructions("Answer in one sentence.")
///     .build()?;
/// let reply = agent.chat("What is the capital of Portugal?".into()).await?;
/// println!("{reply}");
/// # Ok(())
/// # }
/// ```
pub struct Agent {
    config: AgentConfig,
    backend: Arc<dyn ChatBackend>,
    transcriber: Arc<dyn Transcriber>,
    context: Arc<dyn ContextProvider>,
    instructions: Option<String>,
    chain_of_thought: Vec<String>,
    reasoning_effort: Option<ReasoningEffort>,
    registry: ToolRegistry,
    tool_definitions: Vec<ToolDefinition>,
    conversation: Conversation,
    usage: Usage,
}

impl Agent {
    pub fn builder(config: AgentConfig) -> AgentBuilder {
        AgentBuilder::new(config)
    }

    /// Run one turn and return the final answer as text.
    pub async fn chat(&mut self, input: ChatInput) -> Result<String> {
        self.run_turn(input, None).await
    }

    /// Run one turn and parse the final answer into `T`.
    pub async fn structured_chat<T>(&mut self, input: ChatInput) -> Result<T>
    where
        T: JsonSchema + DeserializeOwned,
    {
        let schema = OutputSchema::for_type::<T>()?;
        let text = self.run_turn(input, Some(&schema)).await?;
        parse_structured(&text)
    }

    /// Run one turn against a schema supplied at runtime.
    pub async fn structured_chat_with_schema(
        &mut self,
        input: ChatInput,
        schema: OutputSchema,
    ) -> Result<Value> {
        let text = self.run_turn(input, Some(&schema)).await?;
        schema.parse_value(&text)
    }

    /// Get the conversation history.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Tokens spent by every backend call so far.
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    /// Descriptors sent with every request, fixed at build time.
    pub fn tool_definitions(&self) -> &[ToolDefinition] {
        &self.tool_definitions
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Clear conversation history.
    pub fn clear_history(&mut self) {
        self.conversation.clear();
    }

    async fn run_turn(&mut self, input: ChatInput, schema: Option<&OutputSchema>) -> Result<String> {
        self.record_input(input).await?;

        if !self.chain_of_thought.is_empty() {
            self.think().await?;
        }

        let mut reply = self.call_backend(RequestPhase::Tools).await?;
        while reply.has_tool_calls() {
            for call in reply.tool_calls() {
                let args = ToolArguments::parse(&call.function.arguments)?;
                let result = self.registry.dispatch(&call.function.name, &args).await?;
                self.conversation
                    .push(Message::tool_result(call.id.clone(), render_tool_result(result)));
            }
            reply = self.call_backend(RequestPhase::Tools).await?;
        }

        if let Some(schema) = schema {
            self.conversation.pop_last();
            reply = self
                .call_backend(RequestPhase::FinalSchema(schema.response_format()))
                .await?;
        }

        Ok(reply.text())
    }

    /// Turn the caller's input into exactly one user message.
    async fn record_input(&mut self, input: ChatInput) -> Result<()> {
        let ChatInput {
            message,
            mut attachments,
        } = input;
        if attachments.len() > 1 {
            return Err(ColloquyError::InvalidArgument(format!(
                "At most one image attachment per message, got {}",
                attachments.len()
            )));
        }
        if let Some(image) = attachments.first() {
            image.ensure_image()?;
        }

        let text = match message {
            InputMessage::Text(text) => text,
            InputMessage::Audio(clip) => {
                let text = self.transcriber.transcribe(&clip.data, &clip.mime_type).await?;
                debug!(chars = text.len(), "Transcribed audio input");
                text
            }
        };

        let message = match attachments.pop() {
            Some(image) => Message::user_with_image(text, image.data_url()),
            None => Message::user(self.context.augment(text).await?),
        };
        self.conversation.push(message);
        Ok(())
    }

    async fn think(&mut self) -> Result<()> {
        for prompt in self.chain_of_thought.clone() {
            self.conversation.push(Message::user(prompt));
            self.call_backend(RequestPhase::Thought).await?;
        }
        self.conversation.push(Message::user(""));
        Ok(())
    }

    /// Send the transcript, record the reply and its usage.
    async fn call_backend(&mut self, phase: RequestPhase) -> Result<Message> {
        let request = self.build_request(phase);
        debug!(
            backend = self.backend.provider_name(),
            messages = request.messages.len(),
            tool_choice = ?request.tool_choice,
            structured = request.response_format.is_some(),
            "Calling chat backend"
        );

        let completion = self.backend.complete(&request).await?;
        self.usage.merge(&completion.usage);

        let reply = completion.into_first_message().ok_or_else(|| {
            ColloquyError::response_validation("completion has no choices", String::new())
        })?;
        self.conversation.push(reply.clone());
        Ok(reply)
    }

    fn build_request(&self, phase: RequestPhase) -> ChatRequest {
        let mut messages = Vec::with_capacity(self.conversation.len() + 1);
        if let Some(instructions) = &self.instructions {
            messages.push(Message::system(instructions.clone()));
        }
        messages.extend(self.conversation.messages().iter().cloned());

        let has_tools = !self.tool_definitions.is_empty();
        let (tool_choice, response_format) = match phase {
            RequestPhase::Thought => (has_tools.then_some(ToolChoice::None), None),
            RequestPhase::Tools => (has_tools.then_some(ToolChoice::Auto), None),
            RequestPhase::FinalSchema(format) => (has_tools.then_some(ToolChoice::Auto), Some(format)),
        };

        ChatRequest {
            model: self.config.completion_model.clone(),
            reasoning_effort: self.reasoning_effort,
            messages,
            response_format,
            tools: has_tools.then(|| self.tool_definitions.clone()),
            tool_choice,
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("backend", &self.backend.provider_name())
            .field("model", &self.config.completion_model)
            .field("tools", &self.registry)
            .field("messages", &self.conversation.len())
            .finish()
    }
}

/// Strings go back verbatim, anything else as JSON text.
fn render_tool_result(result: Value) -> String {
    match result {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Fluent construction of an [`Agent`].
pub struct AgentBuilder {
    config: AgentConfig,
    backend: Option<Arc<dyn ChatBackend>>,
    transcriber: Option<Arc<dyn Transcriber>>,
    context: Arc<dyn ContextProvider>,
    instructions: Option<String>,
    chain_of_thought: Vec<String>,
    reasoning_effort: Option<ReasoningEffort>,
    tools: Vec<Arc<dyn Tool>>,
    history: Vec<Message>,
}

impl AgentBuilder {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            backend: None,
            transcriber: None,
            context: Arc::new(NoContext),
            instructions: None,
            chain_of_thought: Vec::new(),
            reasoning_effort: None,
            tools: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Use a specific backend instead of the HTTP one built from config.
    pub fn with_backend(mut self, backend: Arc<dyn ChatBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// System instructions prepended to every request.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Prompts sent, in order, before the backend may answer or call tools.
    pub fn with_chain_of_thought<I, S>(mut self, prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chain_of_thought = prompts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = Some(effort);
        self
    }

    /// Add a tool.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_context_provider(mut self, context: Arc<dyn ContextProvider>) -> Self {
        self.context = context;
        self
    }

    /// Seed the transcript, e.g. with a previous session's messages.
    pub fn with_history(mut self, messages: Vec<Message>) -> Self {
        self.history = messages;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let mut registry = ToolRegistry::new();
        for tool in self.tools {
            registry.register(tool)?;
        }
        let tool_definitions = registry.definitions();

        let backend: Arc<dyn ChatBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(OpenAiChatBackend::from_config(&self.config)),
        };
        let transcriber: Arc<dyn Transcriber> = match self.transcriber {
            Some(transcriber) => transcriber,
            None => Arc::new(OpenAiTranscriber::from_config(&self.config)),
        };

        Ok(Agent {
            config: self.config,
            backend,
            transcriber,
            context: self.context,
            instructions: self.instructions,
            chain_of_thought: self.chain_of_thought,
            reasoning_effort: self.reasoning_effort,
            registry,
            tool_definitions,
            conversation: Conversation::with_messages(self.history),
            usage: Usage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn tool_results_render_strings_verbatim() {
        assert_eq!(render_tool_result(json!("sunny")), "sunny");
        assert_eq!(render_tool_result(json!({"temp": 21})), r#"{"temp":21}"#);
        assert_eq!(render_tool_result(json!(null)), "null");
    }

    #[test]
    fn request_shape_depends_on_phase() {
        let agent = Agent::builder(AgentConfig::builder().completion_model("m").build())
            .with_instructions("be brief")
            .with_tool(Arc::new(crate::tools::FnTool::sync(
                "noop",
                "Does nothing.",
                crate::tools::ToolParameters::empty(),
                |_| Ok(json!(null)),
            )))
            .build()
            .unwrap();

        let thought = agent.build_request(RequestPhase::Thought);
        assert_eq!(thought.model, "m");
        assert_eq!(thought.tool_choice, Some(ToolChoice::None));
        assert_eq!(thought.messages[0].role, Role::System);
        assert!(thought.response_format.is_none());

        let format = ResponseFormat::json_schema("x", json!({"type": "object"}));
        let last = agent.build_request(RequestPhase::FinalSchema(format.clone()));
        assert_eq!(last.tool_choice, Some(ToolChoice::Auto));
        assert_eq!(last.response_format, Some(format));
        assert_eq!(last.tools.map(|t| t.len()), Some(1));
    }

    #[test]
    fn no_tools_means_no_tool_fields() {
        let agent = Agent::builder(AgentConfig::default()).build().unwrap();
        let request = agent.build_request(RequestPhase::Thought);
        assert!(request.tools.is_none());
        assert!(request.tool_choice.is_none());
        assert!(request.messages.is_empty());
    }
}
