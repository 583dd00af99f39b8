//! Session service trait

use super::{Event, Session};
use crate::error::MemoriaResult;
use async_trait::async_trait;

/// Storage for conversation sessions
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Create a new, empty session
    ///
    /// A UUID is generated when `session_id` is `None`. Fails with
    /// [`MemoriaError::SessionAlreadyExists`](crate::MemoriaError::SessionAlreadyExists)
    /// if the id is taken.
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: Option<&str>,
    ) -> MemoriaResult<Session>;

    /// Fetch a session with all of its events
    ///
    /// Fails with [`MemoriaError::SessionNotFound`](crate::MemoriaError::SessionNotFound)
    /// if it does not exist.
    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> MemoriaResult<Session>;

    /// All sessions of a user, ordered by id
    async fn list_sessions(&self, app_name: &str, user_id: &str) -> MemoriaResult<Vec<Session>>;

    /// Append an event to the stored session and to `session`
    ///
    /// Partial events are returned untouched and never stored.
    async fn append_event(&self, session: &mut Session, event: Event) -> MemoriaResult<Event>;
}
