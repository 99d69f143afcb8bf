mod builder;

use crate::server::StdioServerParams;
use crate::tool::{ToolCallRequest, ToolCallResult, ToolDefinition, Toolset};
pub use builder::AgentBuilder;

/// A declared agent: a model, an instruction and the tools it may call.
///
/// The agent does not talk to the model itself. Whoever drives the
/// conversation reads [`Agent::model`], [`Agent::instruction`] and
/// [`Agent::definitions`], and hands tool call requests back through
/// [`Agent::call`].
pub struct Agent {
    name: String,
    description: String,
    model: String,
    instruction: String,
    toolset: Toolset,
    servers: Vec<StdioServerParams>,
}

impl Agent {
    /// Returns the agent name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a short description of what the agent is for.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the resolved model identifier.
    #[inline]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the system instruction.
    #[inline]
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Returns the definitions of the local tools.
    #[inline]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.toolset.definitions()
    }

    /// Returns the stdio servers that provide additional tools.
    #[inline]
    pub fn servers(&self) -> &[StdioServerParams] {
        &self.servers
    }

    /// Calls one of the local tools.
    #[inline]
    pub fn call(
        &self,
        req: ToolCallRequest,
    ) -> impl Future<Output = ToolCallResult> + Send + 'static {
        debug!("agent `{}` handles tool call {}", self.name, req.name);
        self.toolset.call(req)
    }
}

impl Agent {
    fn from_builder(builder: AgentBuilder) -> Self {
        let AgentBuilder {
            name,
            description,
            model,
            instruction,
            toolset,
            servers,
        } = builder;

        Self {
            name,
            description,
            model,
            instruction,
            toolset,
            servers,
        }
    }
}
