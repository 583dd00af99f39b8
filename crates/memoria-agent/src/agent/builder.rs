//! Agent builder for fluent API

use super::agent::LlmAgent;
use super::callback::TurnHook;
use super::config::AgentConfig;
use super::tools::Tool;
use crate::error::{MemoriaError, MemoriaResult};
use memoria_llm::Model;
use std::sync::Arc;

/// Builder for creating agents
pub struct LlmAgentBuilder {
    config: AgentConfig,
    model: Option<Arc<dyn Model>>,
    tools: Vec<Arc<dyn Tool>>,
    after_turn_hooks: Vec<Arc<dyn TurnHook>>,
}

impl LlmAgentBuilder {
    /// Create a new agent builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: AgentConfig::new(name),
            model: None,
            tools: Vec::new(),
            after_turn_hooks: Vec::new(),
        }
    }

    /// Set the model
    pub fn with_model(mut self, model: Arc<dyn Model>) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the system instruction
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.instruction = instruction.into();
        self
    }

    /// Add a tool
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Add multiple tools
    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    /// Register a hook to run after every turn
    pub fn with_after_turn_hook(mut self, hook: Arc<dyn TurnHook>) -> Self {
        self.after_turn_hooks.push(hook);
        self
    }

    /// Set maximum model calls per turn
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Build the agent
    pub fn build(self) -> MemoriaResult<LlmAgent> {
        let model = self
            .model
            .ok_or_else(|| MemoriaError::agent(&self.config.name, "model is required"))?;

        if self.config.max_iterations == 0 {
            return Err(MemoriaError::agent(
                &self.config.name,
                "max_iterations must be at least 1",
            ));
        }

        Ok(LlmAgent::new(
            model,
            self.tools,
            self.after_turn_hooks,
            self.config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AutoSaveToMemory, PreloadMemoryTool};
    use memoria_llm::ScriptedModel;

    #[test]
    fn test_build_requires_model() {
        let err = LlmAgentBuilder::new("NoModel").build().unwrap_err();
        assert!(err.to_string().contains("model is required"));
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let result = LlmAgentBuilder::new("Agent")
            .with_model(Arc::new(ScriptedModel::new("m")))
            .with_max_iterations(0)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_collects_tools_and_hooks() {
        let agent = LlmAgentBuilder::new("AutoMemoryAgent")
            .with_model(Arc::new(ScriptedModel::new("m")))
            .with_instruction("Answer user questions.")
            .with_tool(PreloadMemoryTool::shared())
            .with_after_turn_hook(AutoSaveToMemory::shared())
            .build()
            .unwrap();

        assert_eq!(agent.name(), "AutoMemoryAgent");
        assert_eq!(agent.config().instruction, "Answer user questions.");
        assert_eq!(agent.tools()[0].name(), "preload_memory");
        assert_eq!(agent.after_turn_hooks()[0].name(), "auto_save_to_memory");
    }
}
