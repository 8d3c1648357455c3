//! Tool trait and closure-based tool wrapper.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use super::arguments::ToolArguments;
use super::types::ToolParameters;
use crate::error::ColloquyError;
use crate::types::ToolDefinition;

/// A capability the backend may invoke mid-conversation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description shown to the model.
    fn description(&self) -> &str;

    /// Declared parameters.
    fn parameters(&self) -> &ToolParameters;

    /// Run the tool with decoded arguments.
    async fn invoke(&self, args: &ToolArguments) -> Result<serde_json::Value, ColloquyError>;

    /// Wire descriptor for this tool.
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name(),
            self.description().trim(),
            self.parameters().to_schema(),
        )
    }
}

type ToolHandler =
    dyn Fn(ToolArguments) -> BoxFuture<'static, Result<serde_json::Value, ColloquyError>> + Send + Sync;

/// Closure-based tool for quick tool creation.
///
/// ```
/// use colloquy::tools::{FnTool, ToolParameters};
///
/// let add = FnTool::new(
///     "add",
///     "Add two numbers.",
///     ToolParameters::builder()
///         .number("a", "first addend")
///         .number("b", "second addend")
///         .build(),
///     |args| async move { Ok(serde_json::json!(args.get_f64("a")? + args.get_f64("b")?)) },
/// );
/// ```
#[derive(Clone)]
pub struct FnTool {
    name: String,
    description: String,
    parameters: ToolParameters,
    handler: Arc<ToolHandler>,
}

impl FnTool {
    /// Create a tool from a closure returning a future.
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<serde_json::Value, ColloquyError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler: Arc::new(move |args| Box::pin(handler(args))),
        }
    }

    /// Create a tool from a synchronous closure.
    pub fn sync<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        handler: F,
    ) -> Self
    where
        F: Fn(&ToolArguments) -> Result<serde_json::Value, ColloquyError> + Send + Sync + 'static,
    {
        Self::new(name, description, parameters, move |args| {
            std::future::ready(handler(&args))
        })
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn invoke(&self, args: &ToolArguments) -> Result<serde_json::Value, ColloquyError> {
        (self.handler)(args.clone()).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
