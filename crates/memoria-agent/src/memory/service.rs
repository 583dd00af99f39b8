//! Memory service trait and records

use crate::error::MemoriaResult;
use crate::session::Session;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use memoria_llm::Content;
use serde::{Deserialize, Serialize};

/// One remembered piece of conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Remembered content
    pub content: Content,

    /// Author of the source event (`"user"` or an agent name)
    pub author: String,

    /// When the source event happened
    pub timestamp: DateTime<Utc>,
}

impl MemoryEntry {
    /// Text of the first content part
    pub fn text(&self) -> Option<&str> {
        self.content.first_text()
    }
}

/// Result of a memory search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMemoryResponse {
    /// Matching entries, in ingestion order
    pub memories: Vec<MemoryEntry>,
}

impl SearchMemoryResponse {
    /// Number of matches
    pub fn len(&self) -> usize {
        self.memories.len()
    }

    /// True when nothing matched
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }
}

/// Searchable long-term memory scoped by (application, user)
#[async_trait]
pub trait MemoryService: Send + Sync {
    /// Ingest a session's events
    async fn add_session_to_memory(&self, session: &Session) -> MemoriaResult<()>;

    /// Find remembered entries matching a query
    async fn search_memory(
        &self,
        app_name: &str,
        user_id: &str,
        query: &str,
    ) -> MemoriaResult<SearchMemoryResponse>;
}
