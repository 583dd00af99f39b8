//! Error types for sessions, memory and agents

use memoria_llm::ModelError;
use thiserror::Error;

/// Result type used throughout memoria-agent
pub type MemoriaResult<T> = Result<T, MemoriaError>;

/// Errors raised by Memoria services and agents
#[derive(Debug, Error)]
pub enum MemoriaError {
    /// No session exists under the requested key
    #[error("Session not found: {app_name}/{user_id}/{session_id}")]
    SessionNotFound {
        /// Application name
        app_name: String,
        /// User identifier
        user_id: String,
        /// Session identifier
        session_id: String,
    },

    /// A session with the requested key already exists
    #[error("Session already exists: {app_name}/{user_id}/{session_id}")]
    SessionAlreadyExists {
        /// Application name
        app_name: String,
        /// User identifier
        user_id: String,
        /// Session identifier
        session_id: String,
    },

    /// The model call failed
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Agent-level failure
    #[error("Agent '{agent}' error: {message}")]
    Agent {
        /// Agent name
        agent: String,
        /// What went wrong
        message: String,
    },

    /// A tool failed while running
    #[error("Tool '{tool}' failed: {message}")]
    Tool {
        /// Tool name
        tool: String,
        /// What went wrong
        message: String,
    },

    /// A memory service operation failed
    #[error("Memory error during {operation}: {message}")]
    Memory {
        /// Operation that failed
        operation: String,
        /// What went wrong
        message: String,
    },

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MemoriaError {
    /// Create a session-not-found error
    pub fn session_not_found(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self::SessionNotFound {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }

    /// Create a session-already-exists error
    pub fn session_already_exists(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self::SessionAlreadyExists {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }

    /// Create an agent error
    pub fn agent(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Agent {
            agent: agent.into(),
            message: message.into(),
        }
    }

    /// Create a tool error
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Create a memory error
    pub fn memory(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Memory {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// True for [`MemoriaError::SessionNotFound`]
    pub fn is_session_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound { .. })
    }
}
