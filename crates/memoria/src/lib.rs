//! # Memoria - Memory lifecycle for LLM agents
//!
//! **Memoria** brings together:
//!
//! - **Memoria LLM**: content types, the `Model` trait, retry policy and
//!   offline models
//! - **Memoria Agent**: session and memory services, agents with memory
//!   tools and after-turn hooks, runners and a multi-query orchestrator
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use memoria::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = RetryingModel::new(
//!         RecallModel::new("gemini-2.5-flash-lite"),
//!         HttpRetryOptions::default(),
//!     );
//!
//!     let agent = LlmAgentBuilder::new("PreloadMemoryAgent")
//!         .with_model(Arc::new(model))
//!         .with_instruction("Answer the user's questions")
//!         .with_tool(PreloadMemoryTool::shared())
//!         .build()?;
//!
//!     let runner = Runner::new(
//!         Arc::new(agent),
//!         "MemoryDemoApp",
//!         Arc::new(InMemorySessionService::new()),
//!     )
//!     .with_memory_service(Arc::new(InMemoryMemoryService::new()));
//!
//!     run_session(
//!         &runner,
//!         "demo_user",
//!         "What is my favorite color?",
//!         "color-test",
//!         &mut std::io::stdout(),
//!     )
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Memory lifecycle
//!
//! Sessions reach memory in one of two ways:
//!
//! - **Explicit**: fetch a finished session and pass it to
//!   [`MemoryService::add_session_to_memory`](prelude::MemoryService::add_session_to_memory)
//! - **Automatic**: register [`AutoSaveToMemory`](prelude::AutoSaveToMemory)
//!   on the agent; the runner ingests the session after every turn
//!
//! Memory comes back through `PreloadMemoryTool` (injected into the system
//! instruction before every model call) or `LoadMemoryTool` (called by the
//! model on demand).
//!
//! ## Run the demo
//!
//! ```bash
//! cargo run -p memoria --example memory_demo
//! ```

#![doc(html_root_url = "https://docs.rs/memoria/0.1.0")]
#![warn(missing_docs)]

// Re-export sub-crates
#[cfg(feature = "llm")]
pub use memoria_llm as llm;

#[cfg(feature = "agent")]
pub use memoria_agent as agent;

/// Commonly used types and traits
pub mod prelude {
    #[cfg(feature = "llm")]
    pub use crate::llm::{
        Content, HttpRetryOptions, LlmRequest, LlmResponse, Model, ModelConfig, ModelError,
        Part, RecallModel, RetryingModel, Role, ScriptedModel,
    };

    #[cfg(feature = "agent")]
    pub use crate::agent::{
        inspect::{print_search_results, print_session_events},
        run_session, AppConfig, AutoSaveToMemory, CallbackContext, Event, InMemoryMemoryService,
        InMemorySessionService, LlmAgent, LlmAgentBuilder, LoadMemoryTool, MemoriaError,
        MemoriaResult, MemoryService, PreloadMemoryTool, Runner, SearchMemoryResponse, Session,
        SessionService, Tool, TurnHook, TurnOutcome,
    };
}
