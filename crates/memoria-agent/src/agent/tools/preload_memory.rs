//! Memory preloading

use super::Tool;
use crate::agent::context::InvocationContext;
use crate::error::MemoriaResult;
use crate::memory::SearchMemoryResponse;
use async_trait::async_trait;
use memoria_llm::LlmRequest;
use std::sync::Arc;
use tracing::debug;

/// Injects memories relevant to the user's message into the system instruction
///
/// Runs before every model call. The user's message is the search query;
/// nothing is injected when the runner has no memory service or nothing
/// matches.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreloadMemoryTool;

impl PreloadMemoryTool {
    /// Shareable instance for [`LlmAgentBuilder::with_tool`](crate::agent::LlmAgentBuilder::with_tool)
    pub fn shared() -> Arc<dyn Tool> {
        Arc::new(Self)
    }
}

/// Render search results as a past-conversations block
pub fn format_past_conversations(response: &SearchMemoryResponse) -> String {
    let mut block = String::from(
        "The following content is from your previous conversations with the user.\n\
         It may help you answer the user's current query.\n\
         <PAST_CONVERSATIONS>\n",
    );

    for memory in &response.memories {
        let Some(text) = memory.content.text() else {
            continue;
        };
        block.push_str(&format!("Time: {}\n", memory.timestamp.to_rfc3339()));
        block.push_str(&format!("{}: {}\n", memory.author, text));
    }

    block.push_str("</PAST_CONVERSATIONS>");
    block
}

#[async_trait]
impl Tool for PreloadMemoryTool {
    fn name(&self) -> &str {
        "preload_memory"
    }

    fn description(&self) -> &str {
        "Preloads memories relevant to the user's message into the system instruction"
    }

    async fn process_request(
        &self,
        ctx: &InvocationContext,
        request: &mut LlmRequest,
    ) -> MemoriaResult<()> {
        let Some(query) = ctx.user_content.text() else {
            return Ok(());
        };

        let Some(memory) = ctx.memory_service.as_ref() else {
            debug!(session_id = %ctx.session.id, "No memory service, skipping preload");
            return Ok(());
        };

        let response = memory
            .search_memory(&ctx.app_name, &ctx.user_id, &query)
            .await?;

        if response.is_empty() {
            debug!(session_id = %ctx.session.id, "No memories to preload");
            return Ok(());
        }

        debug!(
            session_id = %ctx.session.id,
            memories = response.len(),
            "Preloading memories into system instruction"
        );
        request.append_instructions(&format_past_conversations(&response));

        Ok(())
    }
}
