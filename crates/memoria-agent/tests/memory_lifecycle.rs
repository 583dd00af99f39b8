//! End-to-end memory scenarios with the offline recall model

use memoria_agent::agent::{AutoSaveToMemory, LlmAgentBuilder, LoadMemoryTool, PreloadMemoryTool};
use memoria_agent::memory::{InMemoryMemoryService, MemoryService};
use memoria_agent::orchestrator::run_session;
use memoria_agent::session::{InMemorySessionService, SessionService};
use memoria_agent::Runner;
use memoria_llm::{HttpRetryOptions, RecallModel, RetryingModel};
use std::sync::Arc;

const APP_NAME: &str = "MemoryDemoApp";
const USER_ID: &str = "demo_user";

struct Services {
    sessions: Arc<InMemorySessionService>,
    memory: Arc<InMemoryMemoryService>,
}

impl Services {
    fn new() -> Self {
        Self {
            sessions: Arc::new(InMemorySessionService::new()),
            memory: Arc::new(InMemoryMemoryService::new()),
        }
    }

    fn runner(&self, builder: LlmAgentBuilder) -> Runner {
        let model = RetryingModel::new(
            RecallModel::new("gemini-2.5-flash-lite"),
            HttpRetryOptions::default(),
        );
        let agent = builder.with_model(Arc::new(model)).build().unwrap();
        Runner::new(Arc::new(agent), APP_NAME, self.sessions.clone())
            .with_memory_service(self.memory.clone())
    }
}

#[tokio::test]
async fn test_explicit_save_then_preload_recall() {
    let services = Services::new();
    let mut out = Vec::new();

    let generic = services.runner(
        LlmAgentBuilder::new("GenericAssistant").with_instruction("Answer the user's questions"),
    );
    run_session(
        &generic,
        USER_ID,
        vec![
            "Hi, my favorite color is blue-green.",
            "And my favorite number is 7.",
        ],
        "conversation-01",
        &mut out,
    )
    .await
    .unwrap();

    let completed = services
        .sessions
        .get_session(APP_NAME, USER_ID, "conversation-01")
        .await
        .unwrap();
    assert_eq!(completed.events.len(), 4);
    services.memory.add_session_to_memory(&completed).await.unwrap();

    let search = services
        .memory
        .search_memory(APP_NAME, USER_ID, "color")
        .await
        .unwrap();
    assert!(search
        .memories
        .iter()
        .any(|m| m.text().is_some_and(|t| t.contains("blue-green"))));

    let preloading = services.runner(
        LlmAgentBuilder::new("PreloadMemoryAgent")
            .with_instruction("Answer the user's questions")
            .with_tool(PreloadMemoryTool::shared()),
    );
    let outcomes = run_session(
        &preloading,
        USER_ID,
        "What is my favorite color?",
        "color-test",
        &mut out,
    )
    .await
    .unwrap();

    let reply = outcomes[0].reply.as_deref().unwrap();
    assert!(reply.contains("blue-green"), "unexpected reply: {reply}");

    let transcript = String::from_utf8(out).unwrap();
    assert!(transcript.contains("### Session: color-test"));
    assert!(transcript.contains("User > What is my favorite color?"));
}

#[tokio::test]
async fn test_auto_save_then_recall_in_new_session() {
    let services = Services::new();
    let runner = services.runner(
        LlmAgentBuilder::new("AutoMemoryAgent")
            .with_instruction("Answer the user's questions")
            .with_tool(PreloadMemoryTool::shared())
            .with_after_turn_hook(AutoSaveToMemory::shared()),
    );
    let mut out = Vec::new();

    run_session(
        &runner,
        USER_ID,
        "I gifted a new toy to my nephew on his birthday!",
        "auto-save-test",
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(services.memory.session_count(APP_NAME, USER_ID), 1);

    let outcomes = run_session(
        &runner,
        USER_ID,
        "What did I gift my nephew?",
        "auto-save-test-2",
        &mut out,
    )
    .await
    .unwrap();

    let reply = outcomes[0].reply.as_deref().unwrap();
    assert!(reply.contains("toy"), "unexpected reply: {reply}");
    assert_eq!(services.memory.session_count(APP_NAME, USER_ID), 2);
}

#[tokio::test]
async fn test_model_loads_memory_on_demand() {
    let services = Services::new();
    let mut out = Vec::new();

    let mut past = services
        .sessions
        .create_session(APP_NAME, USER_ID, Some("past"))
        .await
        .unwrap();
    services
        .sessions
        .append_event(
            &mut past,
            memoria_agent::Event::user_message(
                "inv-past",
                memoria_llm::Content::user("My sister lives in Lisbon."),
            ),
        )
        .await
        .unwrap();
    services.memory.add_session_to_memory(&past).await.unwrap();

    let runner = services.runner(
        LlmAgentBuilder::new("LoadMemoryAgent")
            .with_instruction("Answer the user's questions")
            .with_tool(LoadMemoryTool::shared()),
    );
    let outcomes = run_session(
        &runner,
        USER_ID,
        "Where does my sister live?",
        "lookup",
        &mut out,
    )
    .await
    .unwrap();

    let reply = outcomes[0].reply.as_deref().unwrap();
    assert!(reply.contains("Lisbon"), "unexpected reply: {reply}");

    let session = services
        .sessions
        .get_session(APP_NAME, USER_ID, "lookup")
        .await
        .unwrap();
    // user, function call, function response, answer
    assert_eq!(session.events.len(), 4);
}

#[tokio::test]
async fn test_memory_is_scoped_per_user() {
    let services = Services::new();
    let runner = services.runner(
        LlmAgentBuilder::new("AutoMemoryAgent")
            .with_tool(PreloadMemoryTool::shared())
            .with_after_turn_hook(AutoSaveToMemory::shared()),
    );
    let mut out = Vec::new();

    run_session(
        &runner,
        "alice",
        "My favorite color is crimson.",
        "a1",
        &mut out,
    )
    .await
    .unwrap();

    let outcomes = run_session(&runner, "bob", "What is my favorite color?", "b1", &mut out)
        .await
        .unwrap();

    let reply = outcomes[0].reply.as_deref().unwrap();
    assert!(!reply.contains("crimson"));
}
