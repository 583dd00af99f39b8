//! # Memoria Agent
//!
//! Conversational agents with session history and long-term memory.
//!
//! ## Building blocks
//!
//! - [`session`]: append-only event logs keyed by (app, user, session id)
//! - [`memory`]: searchable memory built from ingested sessions
//! - [`agent`]: model-backed agents, memory tools and after-turn hooks
//! - [`runner`]: executes one turn and streams its events
//! - [`orchestrator`]: drives a list of queries through one session
//! - [`inspect`]: prints sessions and search results for diagnostics
//!
//! ## Example
//!
//! ```rust,no_run
//! use memoria_agent::agent::{AutoSaveToMemory, LlmAgentBuilder, PreloadMemoryTool};
//! use memoria_agent::memory::InMemoryMemoryService;
//! use memoria_agent::orchestrator::run_session;
//! use memoria_agent::session::InMemorySessionService;
//! use memoria_agent::Runner;
//! use memoria_llm::RecallModel;
//! use std::sync::Arc;
//!
//! # async fn example() -> memoria_agent::MemoriaResult<()> {
//! let agent = LlmAgentBuilder::new("AutoMemoryAgent")
//!     .with_model(Arc::new(RecallModel::new("gemini-2.5-flash-lite")))
//!     .with_instruction("Answer user questions.")
//!     .with_tool(PreloadMemoryTool::shared())
//!     .with_after_turn_hook(AutoSaveToMemory::shared())
//!     .build()?;
//!
//! let runner = Runner::new(
//!     Arc::new(agent),
//!     "MemoryDemoApp",
//!     Arc::new(InMemorySessionService::new()),
//! )
//! .with_memory_service(Arc::new(InMemoryMemoryService::new()));
//!
//! let mut out = std::io::stdout();
//! run_session(&runner, "demo_user", "I gifted a new toy to my nephew.", "auto-save-test", &mut out).await?;
//! run_session(&runner, "demo_user", "What gift did I give?", "auto-save-test-2", &mut out).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod agent;
pub mod config;
pub mod error;
pub mod inspect;
pub mod memory;
pub mod orchestrator;
pub mod runner;
pub mod session;

pub use agent::{
    AutoSaveToMemory, CallbackContext, EventStream, LlmAgent, LlmAgentBuilder, LoadMemoryTool,
    PreloadMemoryTool, Tool, TurnHook,
};
pub use config::AppConfig;
pub use error::{MemoriaError, MemoriaResult};
pub use memory::{InMemoryMemoryService, MemoryEntry, MemoryService, SearchMemoryResponse};
pub use orchestrator::{get_or_create_session, run_session, TurnOutcome, UserQueries};
pub use runner::Runner;
pub use session::{Event, InMemorySessionService, Session, SessionService};
