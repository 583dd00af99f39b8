//! Agent tools
//!
//! A tool can take part in a turn in two ways: by rewriting every model
//! request before it is sent ([`Tool::process_request`]), or by being called
//! by the model through a function call ([`Tool::call`]).

mod load_memory;
mod preload_memory;

pub use load_memory::LoadMemoryTool;
pub use preload_memory::PreloadMemoryTool;

use super::context::InvocationContext;
use crate::error::{MemoriaError, MemoriaResult};
use async_trait::async_trait;
use memoria_llm::{FunctionDeclaration, LlmRequest};

/// A capability attached to an agent
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name; function calls are routed by it
    fn name(&self) -> &str;

    /// Short description
    fn description(&self) -> &str;

    /// Function declaration offered to the model, if the model may call it
    fn declaration(&self) -> Option<FunctionDeclaration> {
        None
    }

    /// Runs before every model call of the turn
    async fn process_request(
        &self,
        _ctx: &InvocationContext,
        _request: &mut LlmRequest,
    ) -> MemoriaResult<()> {
        Ok(())
    }

    /// Executes a function call issued by the model
    async fn call(
        &self,
        _ctx: &InvocationContext,
        _args: serde_json::Value,
    ) -> MemoriaResult<serde_json::Value> {
        Err(MemoriaError::tool(
            self.name(),
            "this tool cannot be called by the model",
        ))
    }
}
