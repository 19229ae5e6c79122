//! Mock provider for testing
//!
//! Deterministic replies without network access. Every request is recorded
//! so tests can assert on what the model was shown.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use super::error::{ProviderError, ProviderResult};
use super::traits::{ModelRequest, Provider, ProviderModelConfig};
use crate::logging::Logger;
use crate::types::{ContentBlock, ConversationTurn};

/// Mock response mode
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the last user message
    #[default]
    Echo,
    /// Always reply with the same text
    Fixed(String),
    /// Pop one reply per request; fails once the script runs out
    Scripted(Vec<Vec<ContentBlock>>),
    /// Request the same tool on every round
    AlwaysToolUse { tool: String, input: serde_json::Value },
    /// Fail every request
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub mode: MockMode,
    /// Delay before replying (0 = none)
    pub delay_ms: u64,
}

/// Snapshot of one request the mock received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system: String,
    pub history: Vec<ConversationTurn>,
    pub tool_names: Vec<String>,
    pub max_tokens: u32,
}

pub struct MockProvider {
    config: MockConfig,
    script: Mutex<VecDeque<Vec<ContentBlock>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    logger: Arc<dyn Logger>,
}

impl MockProvider {
    pub fn with_config(config: MockConfig, logger: Arc<dyn Logger>) -> Self {
        let script = match &config.mode {
            MockMode::Scripted(replies) => replies.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Self {
            config,
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
            logger,
        }
    }

    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::with_config(MockConfig::default(), logger)
    }

    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_config(
            MockConfig {
                mode: MockMode::Fixed(response.into()),
                ..Default::default()
            },
            logger,
        )
    }

    pub fn scripted(replies: Vec<Vec<ContentBlock>>, logger: Arc<dyn Logger>) -> Self {
        Self::with_config(
            MockConfig {
                mode: MockMode::Scripted(replies),
                ..Default::default()
            },
            logger,
        )
    }

    pub fn always_tool_use(
        tool: impl Into<String>,
        input: serde_json::Value,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self::with_config(
            MockConfig {
                mode: MockMode::AlwaysToolUse {
                    tool: tool.into(),
                    input,
                },
                ..Default::default()
            },
            logger,
        )
    }

    pub fn error(message: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::with_config(
            MockConfig {
                mode: MockMode::Error(message.into()),
                ..Default::default()
            },
            logger,
        )
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.config.delay_ms = delay_ms;
        self
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    fn last_user_text(history: &[ConversationTurn]) -> String {
        history
            .iter()
            .rev()
            .find_map(|turn| match turn {
                ConversationTurn::User { text } if !text.is_empty() => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "Hello from MockProvider!".to_string())
    }

    fn next_reply(&self, history: &[ConversationTurn], round: usize) -> ProviderResult<Vec<ContentBlock>> {
        match &self.config.mode {
            MockMode::Echo => Ok(vec![ContentBlock::text(Self::last_user_text(history))]),
            MockMode::Fixed(text) => Ok(vec![ContentBlock::text(text.clone())]),
            MockMode::Scripted(_) => self
                .script
                .lock()
                .pop_front()
                .ok_or_else(|| ProviderError::Other("mock script exhausted".to_string())),
            MockMode::AlwaysToolUse { tool, input } => Ok(vec![ContentBlock::tool_use(
                format!("toolu_mock_{}", round),
                tool.clone(),
                input.clone(),
            )]),
            MockMode::Error(message) => Err(ProviderError::api_error("mock", message.clone())),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        model: &ProviderModelConfig,
        request: ModelRequest<'_>,
    ) -> ProviderResult<Vec<ContentBlock>> {
        let round = {
            let mut requests = self.requests.lock();
            requests.push(RecordedRequest {
                system: request.system.to_string(),
                history: request.history.to_vec(),
                tool_names: request.tools.iter().map(|t| t.name.clone()).collect(),
                max_tokens: request.max_tokens,
            });
            requests.len()
        };

        self.logger.debug(&format!(
            "[MockProvider] Request #{} for model {} ({} turns)",
            round,
            model.model,
            request.history.len()
        ));

        if self.config.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
        }

        self.next_reply(request.history, round)
    }
}
