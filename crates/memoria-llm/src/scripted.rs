//! Scripted model for tests and offline runs

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::types::{LlmRequest, LlmResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A model that replays a queue of prepared outcomes
///
/// Every request is recorded so callers can inspect exactly what the agent
/// sent. When the queue is empty the call fails with
/// [`ModelError::InvalidResponse`].
pub struct ScriptedModel {
    name: String,
    script: Mutex<VecDeque<ModelResult<LlmResponse>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedModel {
    /// Create a model with an empty script
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response
    pub fn push_response(&self, response: LlmResponse) {
        self.script.lock().push_back(Ok(response));
    }

    /// Queue a final text response
    pub fn push_text(&self, text: impl Into<String>) {
        self.push_response(LlmResponse::text(text));
    }

    /// Queue an error
    pub fn push_error(&self, error: ModelError) {
        self.script.lock().push_back(Err(error));
    }

    /// Builder-style [`push_text`](Self::push_text)
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Builder-style [`push_response`](Self::push_response)
    pub fn with_response(self, response: LlmResponse) -> Self {
        self.push_response(response);
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().clone()
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of queued outcomes not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl Model for ScriptedModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_content(&self, request: LlmRequest) -> ModelResult<LlmResponse> {
        self.requests.lock().push(request);

        let next = self.script.lock().pop_front();
        next.unwrap_or_else(|| {
            Err(ModelError::invalid_response(format!(
                "script for model '{}' is exhausted",
                self.name
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_and_records_requests() {
        let model = ScriptedModel::new("scripted")
            .with_text("one")
            .with_text("two");

        let first = model
            .generate_content(LlmRequest::new("scripted").with_system_instruction("a"))
            .await
            .unwrap();
        let second = model.generate_content(LlmRequest::new("scripted")).await.unwrap();

        assert_eq!(first.text_content().as_deref(), Some("one"));
        assert_eq!(second.text_content().as_deref(), Some("two"));
        assert_eq!(model.call_count(), 2);
        assert_eq!(model.requests()[0].system_instruction.as_deref(), Some("a"));
        assert_eq!(model.remaining(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_script_errors() {
        let model = ScriptedModel::new("scripted");
        let err = model.generate_content(LlmRequest::new("scripted")).await.unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }
}
