//! Multi-query session driver
//!
//! [`run_session`] submits queries to a [`Runner`] one after another inside a
//! single session and prints a transcript:
//!
//! ```text
//! ### Session: conversation-01
//!
//! User > Hi, my favorite color is blue-green.
//! Model: > Got it, I'll keep that in mind: Hi, my favorite color is blue-green.
//! ```

use crate::error::{MemoriaError, MemoriaResult};
use crate::runner::Runner;
use crate::session::{Event, Session, SessionService};
use futures::StreamExt;
use memoria_llm::Content;
use std::io::Write;
use tracing::{debug, info};

/// Reply text some models emit instead of an empty reply
const NO_REPLY_SENTINEL: &str = "None";

/// One or more queries to submit in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQueries(Vec<String>);

impl UserQueries {
    /// Queries in submission order
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of queries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there is nothing to submit
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for UserQueries {
    fn from(query: &str) -> Self {
        Self(vec![query.to_string()])
    }
}

impl From<String> for UserQueries {
    fn from(query: String) -> Self {
        Self(vec![query])
    }
}

impl From<Vec<String>> for UserQueries {
    fn from(queries: Vec<String>) -> Self {
        Self(queries)
    }
}

impl From<Vec<&str>> for UserQueries {
    fn from(queries: Vec<&str>) -> Self {
        Self(queries.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for UserQueries {
    fn from(queries: &[&str]) -> Self {
        Self(queries.iter().map(|q| q.to_string()).collect())
    }
}

impl IntoIterator for UserQueries {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Result of one submitted query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// The query as submitted
    pub query: String,

    /// Final reply text, if the agent produced a printable one
    pub reply: Option<String>,
}

/// Fetch a session, creating it if it does not exist
///
/// Only [`MemoriaError::SessionNotFound`] triggers creation; other lookup
/// failures propagate. If another caller creates the session first, that
/// session is fetched and returned.
pub async fn get_or_create_session(
    session_service: &dyn SessionService,
    app_name: &str,
    user_id: &str,
    session_id: &str,
) -> MemoriaResult<Session> {
    match session_service
        .get_session(app_name, user_id, session_id)
        .await
    {
        Ok(session) => {
            debug!(session_id, events = session.events.len(), "Resuming session");
            Ok(session)
        }
        Err(e) if e.is_session_not_found() => {
            match session_service
                .create_session(app_name, user_id, Some(session_id))
                .await
            {
                Err(MemoriaError::SessionAlreadyExists { .. }) => {
                    debug!(session_id, "Session created concurrently, fetching it");
                    session_service
                        .get_session(app_name, user_id, session_id)
                        .await
                }
                created => created,
            }
        }
        Err(e) => Err(e),
    }
}

/// Text of the reply to show for a turn
///
/// Picks the last event that is a final response whose first part has text
/// other than the `"None"` sentinel.
pub fn final_reply(events: &[Event]) -> Option<String> {
    events.iter().rev().find_map(printable_reply)
}

/// Reply text of a final event, unless it is empty or the sentinel
fn printable_reply(event: &Event) -> Option<String> {
    if !event.is_final_response() {
        return None;
    }
    event
        .text()
        .filter(|t| !t.is_empty() && *t != NO_REPLY_SENTINEL)
        .map(str::to_string)
}

/// Submit `queries` to one session and print the transcript to `out`
///
/// The session is fetched or created first. Each query runs to completion
/// before the next one is submitted. The first failing turn aborts the
/// remaining queries; anything it printed before failing stays printed.
pub async fn run_session<W: Write>(
    runner: &Runner,
    user_id: &str,
    queries: impl Into<UserQueries>,
    session_id: &str,
    out: &mut W,
) -> MemoriaResult<Vec<TurnOutcome>> {
    let queries = queries.into();
    writeln!(out, "\n### Session: {}", session_id)?;

    get_or_create_session(
        runner.session_service().as_ref(),
        runner.app_name(),
        user_id,
        session_id,
    )
    .await?;

    info!(session_id, queries = queries.len(), "Running session");

    let mut outcomes = Vec::with_capacity(queries.len());
    for query in queries {
        writeln!(out, "\nUser > {}", query)?;

        // Replies are printed as they arrive; a later error (e.g. from an
        // after-turn hook) does not take them back.
        let mut stream = runner.run_async(user_id, session_id, Content::user(query.clone()));
        let mut reply = None;
        let mut event_count = 0usize;
        while let Some(event) = stream.next().await {
            let event = event?;
            event_count += 1;
            if let Some(text) = printable_reply(&event) {
                writeln!(out, "Model: > {}", text)?;
                reply = Some(text);
            }
        }

        if reply.is_none() {
            debug!(session_id, events = event_count, "Turn produced no printable reply");
        }

        outcomes.push(TurnOutcome { query, reply });
    }

    Ok(outcomes)
}
