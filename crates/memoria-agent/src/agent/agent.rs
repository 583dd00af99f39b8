//! Core agent implementation

use super::callback::TurnHook;
use super::config::AgentConfig;
use super::context::InvocationContext;
use super::tools::Tool;
use crate::error::{MemoriaError, MemoriaResult};
use crate::session::Event;
use futures::Stream;
use memoria_llm::{Content, FunctionCall, LlmRequest, Model, Part, Role};
use serde_json::json;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Lazy, finite, single-use stream of the events of one turn
pub type EventStream = Pin<Box<dyn Stream<Item = MemoriaResult<Event>> + Send>>;

/// Agent that answers with a model, optionally using tools
pub struct LlmAgent {
    /// Model binding
    model: Arc<dyn Model>,

    /// Tools, in the order they preprocess requests
    tools: Vec<Arc<dyn Tool>>,

    /// Hooks run by the runner after each turn
    after_turn_hooks: Vec<Arc<dyn TurnHook>>,

    /// Agent configuration
    config: AgentConfig,
}

impl LlmAgent {
    /// Create an agent
    pub fn new(
        model: Arc<dyn Model>,
        tools: Vec<Arc<dyn Tool>>,
        after_turn_hooks: Vec<Arc<dyn TurnHook>>,
        config: AgentConfig,
    ) -> Self {
        Self {
            model,
            tools,
            after_turn_hooks,
            config,
        }
    }

    /// Agent name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Model binding
    pub fn model(&self) -> &Arc<dyn Model> {
        &self.model
    }

    /// Attached tools
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Registered after-turn hooks
    pub fn after_turn_hooks(&self) -> &[Arc<dyn TurnHook>] {
        &self.after_turn_hooks
    }

    /// Run one turn
    ///
    /// The session in `ctx` must already hold the user's message. Events are
    /// produced lazily: each model call happens when the stream is polled.
    /// Tool calls are executed and fed back until the model answers without
    /// calling a tool, or `max_iterations` model calls have been made.
    pub fn run(self: Arc<Self>, ctx: InvocationContext) -> EventStream {
        Box::pin(self.run_turn(ctx))
    }

    fn run_turn(
        self: Arc<Self>,
        ctx: InvocationContext,
    ) -> impl Stream<Item = MemoriaResult<Event>> + Send {
        async_stream::try_stream! {
            let mut contents = ctx.session.conversation_contents();

            info!(
                agent = %self.config.name,
                session_id = %ctx.session.id,
                invocation_id = %ctx.invocation_id,
                history = contents.len(),
                "Agent turn started"
            );

            for iteration in 1..=self.config.max_iterations {
                debug!(iteration, max_iterations = self.config.max_iterations, "Agent iteration");

                let request = self.build_request(&ctx, &contents).await?;
                let response = self.model.generate_content(request).await?;

                let mut event = Event::new(&ctx.invocation_id, &self.config.name)
                    .with_partial(response.partial);
                if let Some(content) = response.content {
                    event = event.with_content(content);
                }

                if event.partial {
                    yield event;
                    continue;
                }

                let calls: Vec<FunctionCall> =
                    event.function_calls().into_iter().cloned().collect();

                if let Some(content) = &event.content {
                    if !content.is_empty() {
                        contents.push(content.clone());
                    }
                }
                yield event;

                if calls.is_empty() {
                    info!(
                        agent = %self.config.name,
                        iterations = iteration,
                        "Agent produced final answer"
                    );
                    return;
                }

                info!(
                    tool_count = calls.len(),
                    tools = ?calls.iter().map(|c| &c.name).collect::<Vec<_>>(),
                    "Agent requesting tool calls"
                );

                let mut parts = Vec::with_capacity(calls.len());
                for call in &calls {
                    let result = self.execute_tool_call(&ctx, call).await;
                    parts.push(Part::function_response(call.name.clone(), result));
                }

                let results = Content::new(Role::User, parts);
                contents.push(results.clone());
                yield Event::new(&ctx.invocation_id, &self.config.name).with_content(results);
            }

            error!(
                agent = %self.config.name,
                max_iterations = self.config.max_iterations,
                "Agent exceeded maximum iterations without reaching final answer"
            );

            Err::<(), _>(MemoriaError::agent(
                &self.config.name,
                format!("exceeded maximum iterations ({})", self.config.max_iterations),
            ))?;
        }
    }

    /// Assemble the request for one model call and let tools adjust it
    async fn build_request(
        &self,
        ctx: &InvocationContext,
        contents: &[Content],
    ) -> MemoriaResult<LlmRequest> {
        let declarations = self.tools.iter().filter_map(|t| t.declaration()).collect();

        let mut request = LlmRequest::new(self.model.name())
            .with_contents(contents.to_vec())
            .with_tools(declarations);
        if !self.config.instruction.is_empty() {
            request = request.with_system_instruction(self.config.instruction.clone());
        }

        for tool in &self.tools {
            tool.process_request(ctx, &mut request).await?;
        }

        debug!(
            tool_count = request.tools.len(),
            message_count = request.contents.len(),
            "Calling model"
        );

        Ok(request)
    }

    /// Execute one function call; failures are reported back to the model
    async fn execute_tool_call(
        &self,
        ctx: &InvocationContext,
        call: &FunctionCall,
    ) -> serde_json::Value {
        let Some(tool) = self.tools.iter().find(|t| t.name() == call.name) else {
            warn!(tool = %call.name, "Model called an unknown tool");
            return json!({ "error": format!("unknown tool '{}'", call.name) });
        };

        match tool.call(ctx, call.args.clone()).await {
            Ok(result) => {
                debug!(tool = %call.name, "Tool execution completed");
                result
            }
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool execution failed");
                json!({ "error": e.to_string() })
            }
        }
    }
}

impl std::fmt::Debug for LlmAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmAgent")
            .field("name", &self.config.name)
            .field("model", &self.model.name())
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field(
                "after_turn_hooks",
                &self.after_turn_hooks.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{LlmAgentBuilder, LoadMemoryTool};
    use crate::memory::{InMemoryMemoryService, MemoryService};
    use crate::session::{new_invocation_id, Session};
    use futures::StreamExt;
    use memoria_llm::{LlmResponse, ScriptedModel};

    fn context(session: Session, memory: Option<Arc<dyn MemoryService>>) -> InvocationContext {
        let user_content = session
            .events
            .last()
            .and_then(|e| e.content.clone())
            .unwrap_or_else(|| Content::user(""));
        InvocationContext {
            invocation_id: new_invocation_id(),
            app_name: session.app_name.clone(),
            user_id: session.user_id.clone(),
            session,
            user_content,
            memory_service: memory,
        }
    }

    fn session_asking(question: &str) -> Session {
        let mut session = Session::new("app", "user", "s1");
        session
            .events
            .push(Event::user_message("inv", Content::user(question)));
        session
    }

    async fn collect(stream: EventStream) -> Vec<MemoriaResult<Event>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn test_single_answer_yields_one_final_event() {
        let model = Arc::new(ScriptedModel::new("scripted").with_text("Hello there"));
        let agent = Arc::new(
            LlmAgentBuilder::new("Greeter")
                .with_model(model.clone())
                .with_instruction("Be brief.")
                .build()
                .unwrap(),
        );

        let events = collect(agent.run(context(session_asking("Hi"), None))).await;

        assert_eq!(events.len(), 1);
        let event = events[0].as_ref().unwrap();
        assert_eq!(event.author, "Greeter");
        assert_eq!(event.text(), Some("Hello there"));
        assert!(event.is_final_response());

        let request = &model.requests()[0];
        assert_eq!(request.system_instruction.as_deref(), Some("Be brief."));
        assert_eq!(request.contents, vec![Content::user("Hi")]);
    }

    #[tokio::test]
    async fn test_tool_round_trip() {
        let memory = Arc::new(InMemoryMemoryService::new());
        let mut past = Session::new("app", "user", "past");
        past.events
            .push(Event::user_message("inv", Content::user("My dog is called Rex")));
        memory.add_session_to_memory(&past).await.unwrap();

        let model = Arc::new(
            ScriptedModel::new("scripted")
                .with_response(LlmResponse::function_call(
                    "load_memory",
                    json!({"query": "dog"}),
                ))
                .with_text("Your dog is Rex."),
        );
        let agent = Arc::new(
            LlmAgentBuilder::new("Recaller")
                .with_model(model.clone())
                .with_tool(LoadMemoryTool::shared())
                .build()
                .unwrap(),
        );

        let events = collect(agent.run(context(
            session_asking("What is my dog called?"),
            Some(memory),
        )))
        .await;
        let events: Vec<Event> = events.into_iter().map(|e| e.unwrap()).collect();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].function_calls()[0].name, "load_memory");
        let result = &events[1].function_responses()[0].response;
        assert_eq!(result["memories"][0]["text"], "My dog is called Rex");
        assert!(events[2].is_final_response());

        let second = &model.requests()[1];
        assert_eq!(second.tools[0].name, "load_memory");
        assert_eq!(second.contents.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_to_model() {
        let model = Arc::new(
            ScriptedModel::new("scripted")
                .with_response(LlmResponse::function_call("nope", json!({})))
                .with_text("Sorry."),
        );
        let agent = Arc::new(
            LlmAgentBuilder::new("Agent")
                .with_model(model.clone())
                .build()
                .unwrap(),
        );

        let events: Vec<Event> = collect(agent.run(context(session_asking("Hi"), None)))
            .await
            .into_iter()
            .map(|e| e.unwrap())
            .collect();

        let error = &events[1].function_responses()[0].response["error"];
        assert!(error.as_str().unwrap().contains("unknown tool"));
        assert_eq!(events[2].text(), Some("Sorry."));
    }

    #[tokio::test]
    async fn test_iteration_limit_ends_stream_with_error() {
        let model = Arc::new(ScriptedModel::new("scripted"));
        for _ in 0..3 {
            model.push_response(LlmResponse::function_call("nope", json!({})));
        }
        let agent = Arc::new(
            LlmAgentBuilder::new("Looper")
                .with_model(model.clone())
                .with_max_iterations(2)
                .build()
                .unwrap(),
        );

        let events = collect(agent.run(context(session_asking("Hi"), None))).await;

        assert_eq!(events.len(), 5);
        assert!(matches!(
            events.last().unwrap(),
            Err(MemoriaError::Agent { .. })
        ));
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_partial_chunks_are_not_added_to_history() {
        let model = Arc::new(
            ScriptedModel::new("scripted")
                .with_response(LlmResponse::text("Hel").into_partial())
                .with_text("Hello"),
        );
        let agent = Arc::new(
            LlmAgentBuilder::new("Streamer")
                .with_model(model.clone())
                .build()
                .unwrap(),
        );

        let events: Vec<Event> = collect(agent.run(context(session_asking("Hi"), None)))
            .await
            .into_iter()
            .map(|e| e.unwrap())
            .collect();

        assert!(events[0].partial);
        assert!(events[1].is_final_response());
        assert_eq!(model.requests()[1].contents.len(), 1);
    }

    #[tokio::test]
    async fn test_model_failure_surfaces_as_error_item() {
        let model = Arc::new(ScriptedModel::new("scripted"));
        model.push_error(memoria_llm::ModelError::transport("connection reset"));
        let agent = Arc::new(
            LlmAgentBuilder::new("Fragile")
                .with_model(model)
                .build()
                .unwrap(),
        );

        let events = collect(agent.run(context(session_asking("Hi"), None))).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(MemoriaError::Model(_))));
    }
}
