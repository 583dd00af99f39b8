//! Model-driven memory lookup

use super::Tool;
use crate::agent::context::InvocationContext;
use crate::error::{MemoriaError, MemoriaResult};
use async_trait::async_trait;
use memoria_llm::FunctionDeclaration;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Lets the model search the user's memory with `load_memory(query)`
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadMemoryTool;

impl LoadMemoryTool {
    /// Shareable instance for [`LlmAgentBuilder::with_tool`](crate::agent::LlmAgentBuilder::with_tool)
    pub fn shared() -> Arc<dyn Tool> {
        Arc::new(Self)
    }
}

#[async_trait]
impl Tool for LoadMemoryTool {
    fn name(&self) -> &str {
        "load_memory"
    }

    fn description(&self) -> &str {
        "Loads memories of past conversations with the current user that match a query"
    }

    fn declaration(&self) -> Option<FunctionDeclaration> {
        Some(FunctionDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Words to look for in past conversations"
                    }
                },
                "required": ["query"]
            }),
        })
    }

    async fn call(
        &self,
        ctx: &InvocationContext,
        args: serde_json::Value,
    ) -> MemoriaResult<serde_json::Value> {
        let query = args
            .get("query")
            .and_then(|q| q.as_str())
            .ok_or_else(|| MemoriaError::tool(self.name(), "missing string argument 'query'"))?;

        let response = ctx.search_memory(query).await?;
        debug!(query, matches = response.len(), "load_memory executed");

        let memories: Vec<serde_json::Value> = response
            .memories
            .iter()
            .map(|m| {
                json!({
                    "author": m.author,
                    "text": m.content.text().unwrap_or_default(),
                    "timestamp": m.timestamp.to_rfc3339(),
                })
            })
            .collect();

        Ok(json!({ "memories": memories }))
    }
}
