//! Turn execution
//!
//! A [`Runner`] binds one agent to an application name, a session service
//! and (optionally) a memory service. Each call to [`Runner::run_async`]
//! executes one turn:
//!
//! 1. load the session and append the user's message
//! 2. run the agent, appending every non-partial event it yields
//! 3. run the agent's after-turn hooks against the updated session
//!
//! Events are yielded as they are produced. Errors end the stream as its
//! last item.

use crate::agent::{CallbackContext, EventStream, InvocationContext, LlmAgent};
use crate::error::MemoriaResult;
use crate::memory::MemoryService;
use crate::session::{new_invocation_id, Event, SessionService};
use futures::{Stream, StreamExt};
use memoria_llm::Content;
use std::sync::Arc;
use tracing::{debug, info};

/// Executes turns of one agent against shared session and memory services
#[derive(Clone)]
pub struct Runner {
    app_name: String,
    agent: Arc<LlmAgent>,
    session_service: Arc<dyn SessionService>,
    memory_service: Option<Arc<dyn MemoryService>>,
}

impl Runner {
    /// Create a runner without a memory service
    pub fn new(
        agent: Arc<LlmAgent>,
        app_name: impl Into<String>,
        session_service: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            agent,
            session_service,
            memory_service: None,
        }
    }

    /// Attach a memory service, used by memory tools and after-turn hooks
    pub fn with_memory_service(mut self, memory_service: Arc<dyn MemoryService>) -> Self {
        self.memory_service = Some(memory_service);
        self
    }

    /// Application name
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Bound agent
    pub fn agent(&self) -> &Arc<LlmAgent> {
        &self.agent
    }

    /// Session service
    pub fn session_service(&self) -> &Arc<dyn SessionService> {
        &self.session_service
    }

    /// Memory service, if any
    pub fn memory_service(&self) -> Option<&Arc<dyn MemoryService>> {
        self.memory_service.as_ref()
    }

    /// Run one turn for `new_message` in an existing session
    ///
    /// Nothing happens until the stream is polled. The session must exist;
    /// a missing session ends the stream with
    /// [`MemoriaError::SessionNotFound`](crate::MemoriaError::SessionNotFound).
    pub fn run_async(
        &self,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        new_message: Content,
    ) -> EventStream {
        Box::pin(self.clone().turn(user_id.into(), session_id.into(), new_message))
    }

    fn turn(
        self,
        user_id: String,
        session_id: String,
        new_message: Content,
    ) -> impl Stream<Item = MemoriaResult<Event>> + Send {
        async_stream::try_stream! {
            let mut session = self
                .session_service
                .get_session(&self.app_name, &user_id, &session_id)
                .await?;

            let invocation_id = new_invocation_id();
            info!(
                app_name = %self.app_name,
                user_id = %user_id,
                session_id = %session_id,
                invocation_id = %invocation_id,
                agent = %self.agent.name(),
                "Turn started"
            );

            self.session_service
                .append_event(
                    &mut session,
                    Event::user_message(&invocation_id, new_message.clone()),
                )
                .await?;

            let ctx = InvocationContext {
                invocation_id: invocation_id.clone(),
                app_name: self.app_name.clone(),
                user_id: user_id.clone(),
                session: session.clone(),
                user_content: new_message,
                memory_service: self.memory_service.clone(),
            };

            let mut events = Arc::clone(&self.agent).run(ctx);
            while let Some(event) = events.next().await {
                let event = self.session_service.append_event(&mut session, event?).await?;
                yield event;
            }

            for hook in self.agent.after_turn_hooks() {
                debug!(hook = %hook.name(), session_id = %session_id, "Running after-turn hook");
                let callback = CallbackContext::new(
                    &session,
                    self.memory_service.as_deref(),
                    &invocation_id,
                    self.agent.name(),
                );
                hook.on_turn_complete(&callback).await?;
            }

            info!(
                session_id = %session_id,
                invocation_id = %invocation_id,
                events = session.events.len(),
                "Turn completed"
            );
        }
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("app_name", &self.app_name)
            .field("agent", &self.agent.name())
            .field("has_memory_service", &self.memory_service.is_some())
            .finish()
    }
}
