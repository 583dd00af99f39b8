//! # Memoria LLM
//!
//! Model binding for Memoria agents.
//!
//! This crate owns everything an agent needs to talk to a language model
//! without knowing how the model is reached:
//!
//! - **Content types**: [`Content`], [`Part`], [`FunctionCall`] and
//!   [`FunctionResponse`] describe one conversational turn
//! - **Model trait**: [`Model`] turns an [`LlmRequest`] into an [`LlmResponse`]
//! - **Retry policy**: [`HttpRetryOptions`] and [`RetryingModel`] retry
//!   transient HTTP failures with exponential backoff
//! - **Configuration**: [`ModelConfig`] loads the model name and retry policy
//!   from the environment
//! - **Offline models**: [`ScriptedModel`] and [`RecallModel`] run without a
//!   network connection
//!
//! ## Example
//!
//! ```rust,no_run
//! use memoria_llm::{HttpRetryOptions, Model, RecallModel, RetryingModel, LlmRequest, Content};
//!
//! # async fn example() -> Result<(), memoria_llm::ModelError> {
//! let model = RetryingModel::new(RecallModel::new("gemini-2.5-flash-lite"), HttpRetryOptions::default());
//!
//! let request = LlmRequest::new(model.name())
//!     .with_system_instruction("Answer user questions in simple words.")
//!     .with_contents(vec![Content::user("My favorite color is blue-green.")]);
//!
//! let response = model.generate_content(request).await?;
//! println!("{:?}", response.text_content());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod model;
pub mod recall;
pub mod retry;
pub mod scripted;
pub mod types;

pub use config::ModelConfig;
pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use recall::RecallModel;
pub use retry::{HttpRetryOptions, RetryingModel};
pub use scripted::ScriptedModel;
pub use types::{
    Content, FunctionCall, FunctionDeclaration, FunctionResponse, LlmRequest, LlmResponse, Part,
    Role,
};
