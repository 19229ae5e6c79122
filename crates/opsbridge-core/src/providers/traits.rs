//! Provider trait definition

use async_trait::async_trait;

use super::error::ProviderResult;
use crate::types::{ContentBlock, ConversationTurn, ModelTool};

/// Model configuration for provider requests
#[derive(Debug, Clone)]
pub struct ProviderModelConfig {
    /// Model identifier as used by the provider's API
    pub model: String,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Custom API base URL
    pub api_base: Option<String>,
}

impl ProviderModelConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            api_base: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }
}

/// One model query: everything the model sees for a single round
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub system: &'a str,
    /// Full conversation so far, oldest first
    pub history: &'a [ConversationTurn],
    pub tools: &'a [ModelTool],
    pub max_tokens: u32,
}

/// Conversational model boundary.
///
/// A reply is an ordered list of content blocks; any `ToolUse` block asks the
/// caller to run that tool and report back in the next request.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name (e.g., "anthropic")
    fn name(&self) -> &str;

    async fn complete(
        &self,
        model: &ProviderModelConfig,
        request: ModelRequest<'_>,
    ) -> ProviderResult<Vec<ContentBlock>>;
}
