//! opsbridge core
//!
//! A tool-orchestration session between a conversational model and a remote
//! MCP gateway. The crate has no opinion about the human-facing surface:
//! front ends own a [`ChatSession`] per connection, hand each user message to
//! an [`Orchestrator`], and render the [`OutboundMessage`]s it emits.
//!
//! ```rust,ignore
//! use opsbridge_core::{ChatSession, GatewayClient, Orchestrator, OrchestratorConfig};
//!
//! let gateway = GatewayClient::connect(&settings.gateway, &api_key, user_id, logger.clone());
//! let mut session = ChatSession::new(gateway);
//! let tools = session.connect().await?;
//!
//! let orchestrator = Orchestrator::new(provider, model, OrchestratorConfig::from_settings(&settings)?, logger);
//! orchestrator.handle_message(&mut session, "Which loads are late?", &sink).await?;
//! ```

pub mod config;
pub mod gateway;
pub mod logging;
pub mod orchestrator;
pub mod providers;
pub mod secrets;
pub mod types;

pub use types::{
    ContentBlock, ConversationTurn, ModelTool, ToolCall, ToolDefinition, ToolResult,
};

pub use gateway::{GatewayClient, GatewayError, GatewayResult, ToolCallResult, ToolOutcome};

pub use orchestrator::{
    ChatSession, MessageSink, OrchestrationError, Orchestrator, OrchestratorConfig,
    OutboundMessage, TurnOutcome,
};

pub use providers::{create_provider, Provider, ProviderError, ProviderModelConfig};

pub use config::{ConfigError, FileConfigProvider, Settings};

pub use secrets::{
    ChainSecretStore, EnvSecretStore, KeychainSecretStore, MemorySecretStore, SecretStore,
    SecretStoreError,
};

pub use logging::{ConsoleLogger, Logger, NoOpLogger, TracingLogger};
