//! After-turn hooks

use super::context::CallbackContext;
use crate::error::MemoriaResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Runs once after every completed turn of the agent it is registered on
///
/// The runner calls hooks in registration order, after the turn's events
/// have been appended to the session and yielded to the caller.
#[async_trait]
pub trait TurnHook: Send + Sync {
    /// Hook name for logs
    fn name(&self) -> &str;

    /// Called with the up-to-date session
    async fn on_turn_complete(&self, ctx: &CallbackContext<'_>) -> MemoriaResult<()>;
}

/// Ingests the session into memory after every turn
///
/// A multi-turn session is ingested once per turn; each ingestion carries
/// the whole session so far.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoSaveToMemory;

impl AutoSaveToMemory {
    /// Shareable instance for [`LlmAgentBuilder::with_after_turn_hook`](super::LlmAgentBuilder::with_after_turn_hook)
    pub fn shared() -> Arc<dyn TurnHook> {
        Arc::new(Self)
    }
}

#[async_trait]
impl TurnHook for AutoSaveToMemory {
    fn name(&self) -> &str {
        "auto_save_to_memory"
    }

    async fn on_turn_complete(&self, ctx: &CallbackContext<'_>) -> MemoriaResult<()> {
        debug!(
            session_id = %ctx.session().id,
            invocation_id = %ctx.invocation_id(),
            events = ctx.session().events.len(),
            "Auto-saving session to memory"
        );
        ctx.add_session_to_memory().await
    }
}
