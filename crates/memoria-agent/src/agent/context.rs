//! Contexts handed to agents, tools and hooks

use crate::error::{MemoriaError, MemoriaResult};
use crate::memory::{MemoryService, SearchMemoryResponse};
use crate::session::Session;
use memoria_llm::Content;
use std::sync::Arc;

/// Everything an agent knows while running one turn
#[derive(Clone)]
pub struct InvocationContext {
    /// Identifier shared by all events of this turn
    pub invocation_id: String,

    /// Application name
    pub app_name: String,

    /// User identifier
    pub user_id: String,

    /// Session snapshot, including the new user event
    pub session: Session,

    /// The message that started this turn
    pub user_content: Content,

    /// Memory service of the runner, if any
    pub memory_service: Option<Arc<dyn MemoryService>>,
}

impl InvocationContext {
    /// Search the user's memory
    ///
    /// Fails when the runner has no memory service.
    pub async fn search_memory(&self, query: &str) -> MemoriaResult<SearchMemoryResponse> {
        let memory = self.memory_service.as_ref().ok_or_else(|| {
            MemoriaError::memory("search_memory", "no memory service is configured on the runner")
        })?;

        memory
            .search_memory(&self.app_name, &self.user_id, query)
            .await
    }
}

impl std::fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationContext")
            .field("invocation_id", &self.invocation_id)
            .field("app_name", &self.app_name)
            .field("user_id", &self.user_id)
            .field("session_id", &self.session.id)
            .field("has_memory_service", &self.memory_service.is_some())
            .finish()
    }
}

/// What an after-turn hook sees
pub struct CallbackContext<'a> {
    session: &'a Session,
    memory_service: Option<&'a dyn MemoryService>,
    invocation_id: &'a str,
    agent_name: &'a str,
}

impl<'a> CallbackContext<'a> {
    /// Create a callback context
    pub fn new(
        session: &'a Session,
        memory_service: Option<&'a dyn MemoryService>,
        invocation_id: &'a str,
        agent_name: &'a str,
    ) -> Self {
        Self {
            session,
            memory_service,
            invocation_id,
            agent_name,
        }
    }

    /// Session as it stands after the turn
    pub fn session(&self) -> &'a Session {
        self.session
    }

    /// Memory service of the runner, if any
    pub fn memory_service(&self) -> Option<&'a dyn MemoryService> {
        self.memory_service
    }

    /// Identifier of the finished turn
    pub fn invocation_id(&self) -> &'a str {
        self.invocation_id
    }

    /// Name of the agent that ran the turn
    pub fn agent_name(&self) -> &'a str {
        self.agent_name
    }

    /// Ingest the current session into memory
    pub async fn add_session_to_memory(&self) -> MemoriaResult<()> {
        let memory = self.memory_service.ok_or_else(|| {
            MemoriaError::memory(
                "add_session_to_memory",
                "no memory service is configured on the runner",
            )
        })?;

        memory.add_session_to_memory(self.session).await
    }
}
