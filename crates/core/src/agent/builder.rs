use super::Agent;
use crate::models::{ModelAliases, ModelRole};
use crate::server::StdioServerParams;
use crate::tool::{Tool, Toolset};

/// [`Agent`] builder.
pub struct AgentBuilder {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) model: String,
    pub(crate) instruction: String,
    pub(crate) toolset: Toolset,
    pub(crate) servers: Vec<StdioServerParams>,
}

impl AgentBuilder {
    /// Creates a new builder for an agent using the given model identifier.
    #[inline]
    pub fn with_model<S1: Into<String>, S2: Into<String>>(
        name: S1,
        model: S2,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            model: model.into(),
            instruction: String::new(),
            toolset: Toolset::default(),
            servers: vec![],
        }
    }

    /// Creates a new builder whose model is resolved from a role.
    #[inline]
    pub fn with_role<S: Into<String>>(
        name: S,
        role: ModelRole,
        aliases: &ModelAliases,
    ) -> Self {
        Self::with_model(name, aliases.get(role))
    }

    /// Sets the description.
    #[inline]
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the system instruction.
    #[inline]
    pub fn with_instruction<S: Into<String>>(mut self, instruction: S) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.toolset.add_tool(tool);
        self
    }

    /// Attaches a stdio server that provides tools of its own.
    #[inline]
    pub fn with_server(mut self, server: StdioServerParams) -> Self {
        self.servers.push(server);
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        Agent::from_builder(self)
    }
}
