//! # Memory
//!
//! Long-term, searchable memory derived from completed sessions.
//!
//! Sessions are ingested with [`MemoryService::add_session_to_memory`] and
//! searched per (application, user) with [`MemoryService::search_memory`].
//!
//! ```rust,no_run
//! use memoria_agent::memory::{InMemoryMemoryService, MemoryService};
//! use memoria_agent::session::{InMemorySessionService, SessionService};
//!
//! # async fn example() -> memoria_agent::MemoriaResult<()> {
//! let sessions = InMemorySessionService::new();
//! let memory = InMemoryMemoryService::new();
//!
//! let session = sessions.get_session("MemoryDemoApp", "demo_user", "conversation-01").await?;
//! memory.add_session_to_memory(&session).await?;
//!
//! let found = memory.search_memory("MemoryDemoApp", "demo_user", "favorite color").await?;
//! println!("{} memories", found.memories.len());
//! # Ok(())
//! # }
//! ```

mod in_memory;
mod service;

pub use in_memory::InMemoryMemoryService;
pub use service::{MemoryEntry, MemoryService, SearchMemoryResponse};
