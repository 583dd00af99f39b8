//! # Memoria Agent Module
//!
//! Model-backed conversational agents with tools and after-turn hooks.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use memoria_agent::agent::{AutoSaveToMemory, LlmAgentBuilder, PreloadMemoryTool};
//!
//! let agent = LlmAgentBuilder::new("AutoMemoryAgent")
//!     .with_model(model)
//!     .with_instruction("Answer user questions.")
//!     .with_tool(PreloadMemoryTool::shared())
//!     .with_after_turn_hook(AutoSaveToMemory::shared())
//!     .build()?;
//! ```

mod agent;
mod builder;
mod callback;
mod config;
mod context;
pub mod tools;

pub use agent::{EventStream, LlmAgent};
pub use builder::LlmAgentBuilder;
pub use callback::{AutoSaveToMemory, TurnHook};
pub use config::AgentConfig;
pub use context::{CallbackContext, InvocationContext};
pub use tools::{LoadMemoryTool, PreloadMemoryTool, Tool};
