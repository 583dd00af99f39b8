//! Application configuration
//!
//! ```text
//! MEMORIA_APP__APP_NAME=MemoryDemoApp
//! MEMORIA_APP__USER_ID=demo_user
//! ```

use crate::error::MemoriaResult;
use serde::{Deserialize, Serialize};

/// Environment prefix for application settings
pub const ENV_PREFIX: &str = "MEMORIA_APP";

/// Identity under which sessions and memories are stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name scoping sessions and memory
    pub app_name: String,

    /// User the demo acts as
    pub user_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "MemoryDemoApp".to_string(),
            user_id: "demo_user".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the environment (and `.env`), falling back to defaults
    pub fn from_env() -> MemoriaResult<Self> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;

        Self::from_config(settings)
    }

    /// `MEMORIA_APP__*` variables
    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX).separator("__")
    }

    /// Deserialize from an already built configuration
    pub fn from_config(settings: config::Config) -> MemoriaResult<Self> {
        Ok(settings.try_deserialize()?)
    }
}
