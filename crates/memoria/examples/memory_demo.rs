//! # Memory Lifecycle Demo
//!
//! Walks through the ways a conversation reaches long-term memory and comes
//! back out of it:
//!
//! 1. Chat in `conversation-01`, then ingest the session explicitly
//! 2. Ask about it from a fresh session with memory preloading
//! 3. Search memory directly
//! 4. Let an after-turn hook ingest `auto-save-test`, then recall it from
//!    `auto-save-test-2`
//!
//! Runs offline with the recall model.
//!
//! ## Run This Example
//!
//! ```bash
//! RUST_LOG=memoria_agent=debug cargo run -p memoria --example memory_demo
//! ```

use memoria::prelude::*;
use std::io::Write;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = AppConfig::from_env()?;
    let model_config = ModelConfig::from_env()?;
    info!(
        app_name = %app.app_name,
        user_id = %app.user_id,
        model = %model_config.model,
        "Starting memory demo"
    );

    let model: Arc<dyn Model> = Arc::new(RetryingModel::new(
        RecallModel::new(&model_config.model),
        model_config.retry.clone(),
    ));

    let session_service = Arc::new(InMemorySessionService::new());
    let memory_service = Arc::new(InMemoryMemoryService::new());
    let mut out = std::io::stdout();

    // 1. Explicit ingestion
    let agent = LlmAgentBuilder::new("MemoryDemoAgent")
        .with_model(model.clone())
        .with_instruction("Answer user questions in simple words.")
        .build()?;
    let runner = Runner::new(Arc::new(agent), &app.app_name, session_service.clone())
        .with_memory_service(memory_service.clone());

    run_session(
        &runner,
        &app.user_id,
        "My favorite color is blue-green. Can you write a Haiku about it?",
        "conversation-01",
        &mut out,
    )
    .await?;

    let session = session_service
        .get_session(&app.app_name, &app.user_id, "conversation-01")
        .await?;
    memory_service.add_session_to_memory(&session).await?;
    writeln!(out, "\nSession added to memory")?;
    print_session_events(&session, &mut out)?;

    // 2. Preloaded recall in a new session
    let agent = LlmAgentBuilder::new("MemoryDemoAgent")
        .with_model(model.clone())
        .with_instruction(
            "Answer user questions in simple words. \
             Use load_memory tool if you need to recall past conversations.",
        )
        .with_tool(PreloadMemoryTool::shared())
        .build()?;
    let runner = Runner::new(Arc::new(agent), &app.app_name, session_service.clone())
        .with_memory_service(memory_service.clone());

    run_session(
        &runner,
        &app.user_id,
        "What is my favorite color?",
        "color-test",
        &mut out,
    )
    .await?;

    // 3. Direct search
    let results = memory_service
        .search_memory(&app.app_name, &app.user_id, "haiku")
        .await?;
    writeln!(out, "\nSearch Results:")?;
    print_search_results(&results, &mut out)?;

    // 4. Automatic ingestion after every turn
    let agent = LlmAgentBuilder::new("AutoMemoryAgent")
        .with_model(model)
        .with_instruction("Answer user questions.")
        .with_tool(PreloadMemoryTool::shared())
        .with_after_turn_hook(AutoSaveToMemory::shared())
        .build()?;
    let auto_runner = Runner::new(Arc::new(agent), &app.app_name, session_service.clone())
        .with_memory_service(memory_service.clone());

    run_session(
        &auto_runner,
        &app.user_id,
        "I gifted a new toy to my nephew on his 1st birthday!",
        "auto-save-test",
        &mut out,
    )
    .await?;

    let outcomes = run_session(
        &auto_runner,
        &app.user_id,
        "What did I gift my nephew?",
        "auto-save-test-2",
        &mut out,
    )
    .await?;

    info!(
        recalled = outcomes.iter().any(|o| o.reply.is_some()),
        sessions = session_service.len(),
        "Memory demo finished"
    );

    Ok(())
}
