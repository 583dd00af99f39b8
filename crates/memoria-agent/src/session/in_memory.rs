//! In-process session storage

use super::{Event, Session, SessionKey, SessionService};
use crate::error::{MemoriaError, MemoriaResult};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Session service backed by a concurrent in-memory map
///
/// Nothing survives the process. Cloned sessions handed out by
/// [`get_session`](SessionService::get_session) are snapshots; appends go
/// through [`append_event`](SessionService::append_event).
#[derive(Debug, Default)]
pub struct InMemorySessionService {
    sessions: DashMap<SessionKey, Session>,
}

impl InMemorySessionService {
    /// Create an empty service
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions across all apps and users
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no session is stored
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: Option<&str>,
    ) -> MemoriaResult<Session> {
        let session_id = session_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let key = SessionKey::new(app_name, user_id, &session_id);

        match self.sessions.entry(key) {
            Entry::Occupied(_) => Err(MemoriaError::session_already_exists(
                app_name, user_id, session_id,
            )),
            Entry::Vacant(slot) => {
                let session = Session::new(app_name, user_id, &session_id);
                slot.insert(session.clone());
                info!(app_name, user_id, session_id = %session.id, "Session created");
                Ok(session)
            }
        }
    }

    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> MemoriaResult<Session> {
        let key = SessionKey::new(app_name, user_id, session_id);
        self.sessions
            .get(&key)
            .map(|s| s.value().clone())
            .ok_or_else(|| MemoriaError::session_not_found(app_name, user_id, session_id))
    }

    async fn list_sessions(&self, app_name: &str, user_id: &str) -> MemoriaResult<Vec<Session>> {
        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .filter(|s| s.key().app_name == app_name && s.key().user_id == user_id)
            .map(|s| s.value().clone())
            .collect();

        sessions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sessions)
    }

    async fn append_event(&self, session: &mut Session, event: Event) -> MemoriaResult<Event> {
        if event.partial {
            return Ok(event);
        }

        let key = session.key();
        let mut stored = self.sessions.get_mut(&key).ok_or_else(|| {
            MemoriaError::session_not_found(&key.app_name, &key.user_id, &key.session_id)
        })?;

        let now = Utc::now();
        stored.events.push(event.clone());
        stored.last_update_time = now;
        drop(stored);

        session.events.push(event.clone());
        session.last_update_time = now;

        debug!(
            session_id = %key.session_id,
            author = %event.author,
            event_id = %event.id,
            "Event appended"
        );

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoria_llm::Content;

    const APP: &str = "MemoryDemoApp";
    const USER: &str = "demo_user";

    #[tokio::test]
    async fn test_create_then_get() {
        let service = InMemorySessionService::new();
        let created = service.create_session(APP, USER, Some("s1")).await.unwrap();
        let fetched = service.get_session(APP, USER, "s1").await.unwrap();

        assert_eq!(created, fetched);
        assert_eq!(service.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_create_fails() {
        let service = InMemorySessionService::new();
        service.create_session(APP, USER, Some("s1")).await.unwrap();

        let err = service.create_session(APP, USER, Some("s1")).await.unwrap_err();
        assert!(matches!(err, MemoriaError::SessionAlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_missing_session_is_not_found() {
        let service = InMemorySessionService::new();
        let err = service.get_session(APP, USER, "missing").await.unwrap_err();
        assert!(err.is_session_not_found());
    }

    #[tokio::test]
    async fn test_generated_ids_are_unique() {
        let service = InMemorySessionService::new();
        let a = service.create_session(APP, USER, None).await.unwrap();
        let b = service.create_session(APP, USER, None).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_sessions_are_scoped_by_user() {
        let service = InMemorySessionService::new();
        service.create_session(APP, USER, Some("shared-id")).await.unwrap();
        service.create_session(APP, "other_user", Some("shared-id")).await.unwrap();

        assert_eq!(service.list_sessions(APP, USER).await.unwrap().len(), 1);
        assert!(service.get_session("OtherApp", USER, "shared-id").await.is_err());
    }

    #[tokio::test]
    async fn test_append_keeps_order_and_updates_snapshot() {
        let service = InMemorySessionService::new();
        let mut session = service.create_session(APP, USER, Some("s1")).await.unwrap();

        for i in 0..3 {
            let event = Event::user_message("inv", Content::user(format!("message {i}")));
            service.append_event(&mut session, event).await.unwrap();
        }

        let stored = service.get_session(APP, USER, "s1").await.unwrap();
        let texts: Vec<_> = stored.events.iter().filter_map(|e| e.text()).collect();
        assert_eq!(texts, vec!["message 0", "message 1", "message 2"]);
        assert_eq!(session.events, stored.events);
    }

    #[tokio::test]
    async fn test_partial_events_are_not_stored() {
        let service = InMemorySessionService::new();
        let mut session = service.create_session(APP, USER, Some("s1")).await.unwrap();

        let partial = Event::new("inv", "agent")
            .with_content(Content::model("Hel"))
            .with_partial(true);
        service.append_event(&mut session, partial).await.unwrap();

        assert!(session.events.is_empty());
        assert!(service.get_session(APP, USER, "s1").await.unwrap().events.is_empty());
    }

    #[tokio::test]
    async fn test_append_to_unknown_session_fails() {
        let service = InMemorySessionService::new();
        let mut orphan = Session::new(APP, USER, "orphan");
        let err = service
            .append_event(&mut orphan, Event::new("inv", "agent"))
            .await
            .unwrap_err();
        assert!(err.is_session_not_found());
    }
}
