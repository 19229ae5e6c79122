//! Configuration
//!
//! [`Settings`] are read from YAML by [`FileConfigProvider`] and then
//! optionally overridden from the environment.

mod error;
mod file;
mod settings;

pub use error::{ConfigError, ConfigResult};
pub use file::FileConfigProvider;
pub use settings::{
    GatewaySettings, ModelSettings, OrchestrationSettings, Settings, ToolExecution,
    DEFAULT_GATEWAY_URL, DEFAULT_MODEL, DEFAULT_PROVIDER, DEFAULT_SYSTEM_PROMPT, ENV_GATEWAY_URL,
    ENV_MAX_TOOL_ROUNDS, ENV_MODEL,
};
