//! The bounded model/tool loop

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use super::error::{OrchestrationError, OrchestrationResult};
use super::messages;
use super::session::ChatSession;
use super::sink::{MessageSink, OutboundMessage};
use crate::config::{ConfigResult, Settings, ToolExecution};
use crate::gateway::{elicitation, GatewayClient, GatewayError, ToolCallResult, ToolOutcome};
use crate::logging::Logger;
use crate::providers::{ModelRequest, Provider, ProviderModelConfig};
use crate::types::{ContentBlock, ConversationTurn, ModelTool, ToolCall, ToolResult};

/// Loop limits and presentation knobs
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub system_prompt: String,
    pub max_tool_rounds: usize,
    pub max_tokens: u32,
    pub tool_timeout: Duration,
    pub model_timeout: Duration,
    pub display_limit: usize,
    pub execution: ToolExecution,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::from_parts(&Settings::default(), crate::config::DEFAULT_SYSTEM_PROMPT.to_string())
    }
}

impl OrchestratorConfig {
    /// Reads the system prompt file if one is configured
    pub fn from_settings(settings: &Settings) -> ConfigResult<Self> {
        Ok(Self::from_parts(settings, settings.system_prompt()?))
    }

    fn from_parts(settings: &Settings, system_prompt: String) -> Self {
        Self {
            system_prompt,
            max_tool_rounds: settings.orchestration.max_tool_rounds.max(1),
            max_tokens: settings.model.max_tokens,
            tool_timeout: Duration::from_secs(settings.orchestration.tool_timeout_secs),
            model_timeout: Duration::from_secs(settings.model.timeout_secs),
            display_limit: settings.orchestration.display_limit,
            execution: settings.orchestration.tool_execution,
        }
    }
}

/// How a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model answered without asking for more tools
    Completed { rounds: usize },
    /// The model was still asking for tools when the round budget ran out
    RoundLimitReached { rounds: usize },
}

impl TurnOutcome {
    pub fn rounds(&self) -> usize {
        match self {
            TurnOutcome::Completed { rounds } | TurnOutcome::RoundLimitReached { rounds } => *rounds,
        }
    }
}

/// Drives one user message through model queries and tool calls.
///
/// The orchestrator holds no per-user state and can serve many sessions.
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    model: ProviderModelConfig,
    config: OrchestratorConfig,
    logger: Arc<dyn Logger>,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: ProviderModelConfig,
        config: OrchestratorConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            provider,
            model,
            config,
            logger,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Handle one user message to completion.
    ///
    /// Appends a `User` turn, then alternates model queries and tool rounds
    /// until the model stops asking for tools or `max_tool_rounds` queries
    /// have been made. Every turn lands in the session history.
    pub async fn handle_message(
        &self,
        session: &mut ChatSession,
        text: &str,
        sink: &dyn MessageSink,
    ) -> OrchestrationResult<TurnOutcome> {
        if !session.is_connected() {
            return Err(OrchestrationError::SessionNotReady);
        }

        let tools = session.gateway().discover_tools().await?;
        let model_tools = GatewayClient::to_model_tool_format(&tools);

        session.push(ConversationTurn::user(text));

        for round in 1..=self.config.max_tool_rounds {
            self.logger.debug(&format!(
                "[Orchestrator] Round {}/{} for {}",
                round,
                self.config.max_tool_rounds,
                session.user_id()
            ));

            let blocks = self.query(session.history(), &model_tools).await?;
            let reply = ConversationTurn::assistant(blocks);
            let text = reply.texts().join("\n\n");
            let calls: Vec<ToolCall> = reply.tool_calls().into_iter().cloned().collect();
            session.push(reply);

            if !text.is_empty() {
                sink.send(OutboundMessage::Text(text)).await;
            }
            if calls.is_empty() {
                return Ok(TurnOutcome::Completed { rounds: round });
            }

            let results = self.execute(session.gateway(), &calls, sink).await;
            session.push(ConversationTurn::tool_results(results));
        }

        let rounds = self.config.max_tool_rounds;
        self.logger.warn(&format!(
            "[Orchestrator] Round limit ({}) reached for {}",
            rounds,
            session.user_id()
        ));
        sink.send(OutboundMessage::Notice(messages::round_limit_reached(rounds)))
            .await;
        Ok(TurnOutcome::RoundLimitReached { rounds })
    }

    async fn query(
        &self,
        history: &[ConversationTurn],
        tools: &[ModelTool],
    ) -> OrchestrationResult<Vec<ContentBlock>> {
        let request = ModelRequest {
            system: &self.config.system_prompt,
            history,
            tools,
            max_tokens: self.config.max_tokens,
        };

        match tokio::time::timeout(self.config.model_timeout, self.provider.complete(&self.model, request)).await {
            Ok(reply) => Ok(reply?),
            Err(_) => {
                let seconds = self.config.model_timeout.as_secs();
                self.logger.error(&format!("[Orchestrator] Model timed out after {}s", seconds));
                Err(OrchestrationError::ModelTimeout { seconds })
            }
        }
    }

    /// Run every requested tool and return results in request order
    async fn execute(
        &self,
        gateway: &GatewayClient,
        calls: &[ToolCall],
        sink: &dyn MessageSink,
    ) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());

        match self.config.execution {
            ToolExecution::Sequential => {
                for call in calls {
                    let invocation = self.invoke(gateway, call).await;
                    results.push(self.settle(call, invocation, sink).await);
                }
            }
            ToolExecution::Concurrent => {
                let invocations = join_all(calls.iter().map(|call| self.invoke(gateway, call))).await;
                for (call, invocation) in calls.iter().zip(invocations) {
                    results.push(self.settle(call, invocation, sink).await);
                }
            }
        }

        results
    }

    async fn invoke(&self, gateway: &GatewayClient, call: &ToolCall) -> Result<ToolCallResult, GatewayError> {
        match tokio::time::timeout(self.config.tool_timeout, gateway.call_tool(&call.name, call.arguments())).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout {
                seconds: self.config.tool_timeout.as_secs(),
            }),
        }
    }

    /// Turn one invocation into a tool result, telling the user what happened
    async fn settle(
        &self,
        call: &ToolCall,
        invocation: Result<ToolCallResult, GatewayError>,
        sink: &dyn MessageSink,
    ) -> ToolResult {
        let result = match invocation {
            Ok(result) => result,
            Err(e) => return self.settle_failure(call, &e.to_string(), sink).await,
        };

        match result.outcome() {
            ToolOutcome::AuthorizationRequired { url } => {
                self.logger.info(&format!("[Orchestrator] {} paused for authorization", call.name));
                self.send_step(call, messages::AUTH_REQUIRED_STEP, false, sink).await;
                sink.send(OutboundMessage::Authorization {
                    tool: call.name.clone(),
                    text: messages::authorization_prompt(&call.name, &url),
                    url: Some(url),
                })
                .await;
                ToolResult::error(&call.id, messages::AUTH_REQUIRED_RESULT)
            }
            ToolOutcome::Failed { message } => {
                let content = messages::error_result(&message);
                self.send_step(call, &content, true, sink).await;
                ToolResult::error(&call.id, content)
            }
            ToolOutcome::Succeeded { text } => {
                self.send_step(call, &text, false, sink).await;
                ToolResult::success(&call.id, text)
            }
        }
    }

    async fn settle_failure(&self, call: &ToolCall, message: &str, sink: &dyn MessageSink) -> ToolResult {
        self.logger.warn(&format!("[Orchestrator] {} failed: {}", call.name, message));
        let content = messages::error_result(message);
        self.send_step(call, &content, true, sink).await;

        if elicitation::is_auth_error(message) {
            let url = elicitation::first_url(message);
            sink.send(OutboundMessage::Authorization {
                tool: call.name.clone(),
                text: messages::authorization_error_prompt(message, url.as_deref()),
                url,
            })
            .await;
        }

        ToolResult::error(&call.id, content)
    }

    async fn send_step(&self, call: &ToolCall, output: &str, is_error: bool, sink: &dyn MessageSink) {
        sink.send(OutboundMessage::ToolStep {
            tool: call.name.clone(),
            input: call.input.clone(),
            output: messages::truncate_for_display(output, self.config.display_limit),
            is_error,
        })
        .await;
    }
}
