//! The model binding trait

use crate::error::ModelResult;
use crate::types::{LlmRequest, LlmResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// A language model reachable through a single request/response call
#[async_trait]
pub trait Model: Send + Sync {
    /// Model identifier, e.g. `gemini-2.5-flash-lite`
    fn name(&self) -> &str;

    /// Generate content for a request
    async fn generate_content(&self, request: LlmRequest) -> ModelResult<LlmResponse>;
}

#[async_trait]
impl<M: Model + ?Sized> Model for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn generate_content(&self, request: LlmRequest) -> ModelResult<LlmResponse> {
        (**self).generate_content(request).await
    }
}
