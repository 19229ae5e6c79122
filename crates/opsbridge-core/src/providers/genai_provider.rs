//! GenaiProvider - conversational model backed by the genai crate

use async_trait::async_trait;
use std::sync::Arc;

use genai::chat::ChatRequest;

use crate::logging::Logger;
use crate::types::{ContentBlock, ModelTool};

use super::error::ProviderResult;
use super::genai_adapter::{
    api_error, create_client, from_genai_response, is_genai_supported, to_genai_messages,
    to_genai_options, to_genai_tools,
};
use super::traits::{ModelRequest, Provider, ProviderModelConfig};

pub struct GenaiProvider {
    provider_id: String,
    logger: Arc<dyn Logger>,
}

impl GenaiProvider {
    pub fn new(provider_id: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider_id: provider_id.into(),
            logger,
        }
    }

    pub fn supports(provider_id: &str) -> bool {
        is_genai_supported(provider_id)
    }

    /// Strip a provider prefix (e.g., "anthropic/claude-sonnet-4-5" -> "claude-sonnet-4-5")
    pub fn extract_model_name(model: &str) -> &str {
        model.split_once('/').map(|(_, name)| name).unwrap_or(model)
    }

    fn build_request(&self, request: &ModelRequest<'_>) -> ProviderResult<ChatRequest> {
        let mut chat_req = ChatRequest::new(to_genai_messages(request.history)?);
        if !request.system.is_empty() {
            chat_req = chat_req.with_system(request.system);
        }
        if !request.tools.is_empty() {
            chat_req = chat_req.with_tools(to_genai_tools(request.tools));
        }
        Ok(chat_req)
    }
}

#[async_trait]
impl Provider for GenaiProvider {
    fn name(&self) -> &str {
        &self.provider_id
    }

    async fn complete(
        &self,
        model: &ProviderModelConfig,
        request: ModelRequest<'_>,
    ) -> ProviderResult<Vec<ContentBlock>> {
        let model_name = Self::extract_model_name(&model.model);
        self.logger.debug(&format!(
            "[GenaiProvider] complete: provider={}, model={}, turns={}, tools=[{}]",
            self.provider_id,
            model_name,
            request.history.len(),
            tool_names(request.tools)
        ));

        let client = create_client(model);
        let chat_req = self.build_request(&request)?;
        let options = to_genai_options(request.max_tokens);

        let response = client
            .exec_chat(model_name, chat_req, Some(&options))
            .await
            .map_err(|e| {
                self.logger.error(&format!("[GenaiProvider] Request failed: {}", e));
                api_error(&self.provider_id, e)
            })?;

        let blocks = from_genai_response(&response);
        self.logger.debug(&format!(
            "[GenaiProvider] Reply with {} blocks ({} tool calls)",
            blocks.len(),
            blocks.iter().filter(|b| b.as_tool_call().is_some()).count()
        ));
        Ok(blocks)
    }
}

/// Tool names as a comma list, for log lines
fn tool_names(tools: &[ModelTool]) -> String {
    tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::types::ConversationTurn;

    #[test]
    fn test_extract_model_name() {
        assert_eq!(
            GenaiProvider::extract_model_name("anthropic/claude-sonnet-4-5-20250929"),
            "claude-sonnet-4-5-20250929"
        );
        assert_eq!(GenaiProvider::extract_model_name("claude-sonnet-4-5-20250929"), "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn test_supports() {
        assert!(GenaiProvider::supports("anthropic"));
        assert!(!GenaiProvider::supports("unknown_provider"));
    }

    #[test]
    fn test_build_request_carries_system_and_tools() {
        let provider = GenaiProvider::new("anthropic", Arc::new(NoOpLogger));
        let history = vec![ConversationTurn::user("any late loads?")];
        let tools = vec![ModelTool {
            name: "detect_exceptions".to_string(),
            description: String::new(),
            input_schema: serde_json::json!({"type": "object"}),
        }];
        let request = ModelRequest {
            system: "You are an operations assistant.",
            history: &history,
            tools: &tools,
            max_tokens: 4096,
        };

        let chat_req = provider.build_request(&request).unwrap();
        assert_eq!(chat_req.system.as_deref(), Some("You are an operations assistant."));
        assert_eq!(chat_req.messages.len(), 1);
        assert_eq!(chat_req.tools.map(|t| t.len()), Some(1));
        assert_eq!(tool_names(&tools), "detect_exceptions");
    }
}
