//! Agent configuration

use serde::{Deserialize, Serialize};

/// Default bound on model calls per turn
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Configuration for an [`LlmAgent`](super::LlmAgent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent name; used as the author of every event it produces
    pub name: String,

    /// System instruction sent with every model call
    pub instruction: String,

    /// Maximum model calls in one turn (tool round trips included)
    pub max_iterations: usize,
}

impl AgentConfig {
    /// Create a configuration with default limits
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: String::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new("MemoriaAgent")
    }
}
