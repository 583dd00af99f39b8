//! Model configuration
//!
//! Loaded from `MEMORIA_MODEL__*` environment variables (a `.env` file is
//! honoured), e.g.
//!
//! ```text
//! MEMORIA_MODEL__MODEL=gemini-2.5-flash-lite
//! MEMORIA_MODEL__RETRY__ATTEMPTS=5
//! MEMORIA_MODEL__RETRY__HTTP_STATUS_CODES=429,500,503,504
//! ```

use crate::error::ModelResult;
use crate::retry::HttpRetryOptions;
use serde::{Deserialize, Serialize};

/// Environment prefix for model settings
pub const ENV_PREFIX: &str = "MEMORIA_MODEL";

/// Model name used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// Model binding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier
    pub model: String,

    /// Retry policy applied to model calls
    pub retry: HttpRetryOptions,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            retry: HttpRetryOptions::default(),
        }
    }
}

impl ModelConfig {
    /// Load from the environment, falling back to defaults
    pub fn from_env() -> ModelResult<Self> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;

        Self::from_config(settings)
    }

    /// `MEMORIA_MODEL__*` variables, with `__` between nested keys
    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("retry.http_status_codes")
    }

    /// Deserialize from an already built configuration
    pub fn from_config(settings: config::Config) -> ModelResult<Self> {
        Ok(settings.try_deserialize()?)
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: HttpRetryOptions) -> Self {
        self.retry = retry;
        self
    }
}
