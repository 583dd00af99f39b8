//! Turn events

use chrono::{DateTime, Utc};
use memoria_llm::{Content, FunctionCall, FunctionResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author tag used for events submitted by the user
pub const USER_AUTHOR: &str = "user";

/// One entry in a session's event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: String,

    /// Turn (invocation) that produced this event
    pub invocation_id: String,

    /// `"user"` or the name of the agent
    pub author: String,

    /// Content carried by the event, if any
    pub content: Option<Content>,

    /// Whether this is an incomplete chunk of a longer reply
    #[serde(default)]
    pub partial: bool,

    /// When the event was created
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Create an event without content
    pub fn new(invocation_id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            invocation_id: invocation_id.into(),
            author: author.into(),
            content: None,
            partial: false,
            timestamp: Utc::now(),
        }
    }

    /// Event carrying a user message
    pub fn user_message(invocation_id: impl Into<String>, content: Content) -> Self {
        Self::new(invocation_id, USER_AUTHOR).with_content(content)
    }

    /// Attach content
    pub fn with_content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    /// Mark as partial
    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Text of the first content part
    pub fn text(&self) -> Option<&str> {
        self.content.as_ref().and_then(|c| c.first_text())
    }

    /// Function calls requested in this event
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.content
            .as_ref()
            .map(|c| c.function_calls())
            .unwrap_or_default()
    }

    /// Function responses carried by this event
    pub fn function_responses(&self) -> Vec<&FunctionResponse> {
        self.content
            .as_ref()
            .map(|c| c.function_responses())
            .unwrap_or_default()
    }

    /// True when the event ends the agent's turn
    ///
    /// Partial chunks, tool calls and tool results are intermediate.
    pub fn is_final_response(&self) -> bool {
        !self.partial && self.function_calls().is_empty() && self.function_responses().is_empty()
    }
}

/// Generate a unique invocation identifier
pub fn new_invocation_id() -> String {
    format!("inv-{}", Uuid::new_v4())
}
