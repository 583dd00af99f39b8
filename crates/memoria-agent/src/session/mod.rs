//! # Sessions
//!
//! A session is the ordered, append-only log of events for one
//! (application, user, session id) triple.
//!
//! ```rust,no_run
//! use memoria_agent::session::{InMemorySessionService, SessionService};
//!
//! # async fn example() -> memoria_agent::MemoriaResult<()> {
//! let sessions = InMemorySessionService::new();
//! let session = sessions
//!     .create_session("MemoryDemoApp", "demo_user", Some("conversation-01"))
//!     .await?;
//! assert!(session.events.is_empty());
//! # Ok(())
//! # }
//! ```

mod event;
mod in_memory;
mod service;

pub use event::{new_invocation_id, Event, USER_AUTHOR};
pub use in_memory::InMemorySessionService;
pub use service::SessionService;

use chrono::{DateTime, Utc};
use memoria_llm::Content;
use serde::{Deserialize, Serialize};

/// Identity of a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    /// Application name
    pub app_name: String,
    /// User identifier
    pub user_id: String,
    /// Session identifier
    pub session_id: String,
}

impl SessionKey {
    /// Create a key
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.app_name, self.user_id, self.session_id)
    }
}

/// A conversation session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Session identifier
    pub id: String,

    /// Application the session belongs to
    pub app_name: String,

    /// User the session belongs to
    pub user_id: String,

    /// Events in the order they were appended
    pub events: Vec<Event>,

    /// Time of the last append (or creation)
    pub last_update_time: DateTime<Utc>,
}

impl Session {
    /// Create an empty session
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            app_name: app_name.into(),
            user_id: user_id.into(),
            events: Vec::new(),
            last_update_time: Utc::now(),
        }
    }

    /// Key identifying this session
    pub fn key(&self) -> SessionKey {
        SessionKey::new(&self.app_name, &self.user_id, &self.id)
    }

    /// Contents of all events carrying at least one part, oldest first
    pub fn conversation_contents(&self) -> Vec<Content> {
        self.events
            .iter()
            .filter_map(|e| e.content.as_ref())
            .filter(|c| !c.is_empty())
            .cloned()
            .collect()
    }
}
