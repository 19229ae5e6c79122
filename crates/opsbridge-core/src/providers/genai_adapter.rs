//! Conversions between conversation types and genai types

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatResponse, ContentPart as GenaiPart,
    MessageContent as GenaiContent, Tool as GenaiTool, ToolCall as GenaiToolCall,
    ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{Client, ModelIden, ServiceTarget};
use serde_json::json;

use super::error::{ProviderError, ProviderResult};
use super::traits::ProviderModelConfig;
use crate::types::{ContentBlock, ConversationTurn, ModelTool, ToolCall};

// ============================================================================
// Conversation -> genai
// ============================================================================

/// Convert our ToolCall to a genai ToolCall
pub fn to_genai_tool_call(call: &ToolCall) -> ProviderResult<GenaiToolCall> {
    let tool_call = serde_json::from_value(json!({
        "call_id": call.id,
        "fn_name": call.name,
        "fn_arguments": call.input,
    }))?;
    Ok(tool_call)
}

/// Convert one turn; a `ToolResults` turn becomes one tool message per result
pub fn to_genai_turn(turn: &ConversationTurn) -> ProviderResult<Vec<GenaiMessage>> {
    match turn {
        ConversationTurn::User { text } => Ok(vec![GenaiMessage::user(text.clone())]),
        ConversationTurn::Assistant { blocks } => {
            if blocks.iter().all(|b| b.as_tool_call().is_none()) {
                let text = turn.texts().join("\n\n");
                return Ok(vec![GenaiMessage::assistant(text)]);
            }

            let mut parts = Vec::with_capacity(blocks.len());
            for block in blocks {
                match block {
                    ContentBlock::Text { text } => parts.push(GenaiPart::Text(text.clone())),
                    ContentBlock::ToolUse(call) => {
                        parts.push(GenaiPart::ToolCall(to_genai_tool_call(call)?))
                    }
                }
            }
            Ok(vec![GenaiMessage::assistant(GenaiContent::from_parts(parts))])
        }
        // genai tool responses carry no error flag; failed results are marked
        // in their content instead ("Error: ..." or the authorization notice).
        ConversationTurn::ToolResults { results } => Ok(results
            .iter()
            .map(|r| GenaiMessage::from(GenaiToolResponse::new(r.call_id.clone(), r.content.clone())))
            .collect()),
    }
}

/// Convert the whole history, preserving order
pub fn to_genai_messages(history: &[ConversationTurn]) -> ProviderResult<Vec<GenaiMessage>> {
    let mut messages = Vec::with_capacity(history.len());
    for turn in history {
        messages.extend(to_genai_turn(turn)?);
    }
    Ok(messages)
}

pub fn to_genai_tool(tool: &ModelTool) -> GenaiTool {
    GenaiTool::new(tool.name.clone())
        .with_description(tool.description.clone())
        .with_schema(tool.input_schema.clone())
}

pub fn to_genai_tools(tools: &[ModelTool]) -> Vec<GenaiTool> {
    tools.iter().map(to_genai_tool).collect()
}

pub fn to_genai_options(max_tokens: u32) -> GenaiOptions {
    GenaiOptions::default().with_max_tokens(max_tokens)
}

// ============================================================================
// genai -> Conversation
// ============================================================================

pub fn from_genai_tool_call(tc: &GenaiToolCall) -> ToolCall {
    ToolCall {
        id: tc.call_id.clone(),
        name: tc.fn_name.clone(),
        input: tc.fn_arguments.clone(),
    }
}

/// Content parts in the order the model produced them; empty text and
/// non-conversational parts are dropped
pub fn from_genai_content(content: &GenaiContent) -> Vec<ContentBlock> {
    content
        .parts()
        .iter()
        .filter_map(|part| match part {
            GenaiPart::Text(text) if !text.is_empty() => Some(ContentBlock::text(text.clone())),
            GenaiPart::ToolCall(tc) => Some(ContentBlock::ToolUse(from_genai_tool_call(tc))),
            _ => None,
        })
        .collect()
}

pub fn from_genai_response(response: &ChatResponse) -> Vec<ContentBlock> {
    from_genai_content(&response.content)
}

// ============================================================================
// Client creation
// ============================================================================

/// Create a genai client using the configured key and endpoint.
///
/// Without an explicit key, genai falls back to its own environment lookup.
pub fn create_client(config: &ProviderModelConfig) -> Client {
    let mut builder = Client::builder();

    if let Some(key) = config.api_key.clone() {
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(key.clone())))
            },
        );
        builder = builder.with_auth_resolver(auth_resolver);
    }

    if let Some(base) = config.api_base.clone() {
        let target_resolver = ServiceTargetResolver::from_resolver_fn(
            move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
                Ok(ServiceTarget {
                    endpoint: Endpoint::from_owned(base.clone()),
                    ..target
                })
            },
        );
        builder = builder.with_service_target_resolver(target_resolver);
    }

    builder.build()
}

/// Providers genai can reach natively
pub fn is_genai_supported(provider: &str) -> bool {
    matches!(
        provider.to_lowercase().as_str(),
        "openai"
            | "anthropic"
            | "gemini"
            | "ollama"
            | "groq"
            | "xai"
            | "deepseek"
            | "cohere"
    )
}

/// Map a provider ID to its secret store key
pub fn provider_to_secret_key(provider: &str) -> String {
    match provider.to_lowercase().as_str() {
        "gemini" | "google" => "google".to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn api_error(provider: &str, err: impl std::fmt::Display) -> ProviderError {
    ProviderError::api_error(provider, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolResult;
    use genai::chat::ChatRole;

    #[test]
    fn test_user_turn_conversion() {
        let messages = to_genai_turn(&ConversationTurn::user("What shipments are late?")).unwrap();
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0].role, ChatRole::User));
    }

    #[test]
    fn test_tool_results_expand_to_one_message_each() {
        let turn = ConversationTurn::tool_results(vec![
            ToolResult::success("toolu_1", "3 late shipments"),
            ToolResult::error("toolu_2", "Error: carrier API down"),
        ]);
        let messages = to_genai_turn(&turn).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| matches!(m.role, ChatRole::Tool)));
    }

    #[test]
    fn test_history_order_is_preserved() {
        let history = vec![
            ConversationTurn::user("check exceptions"),
            ConversationTurn::assistant(vec![
                ContentBlock::text("Looking now."),
                ContentBlock::tool_use("toolu_1", "detect_exceptions", json!({})),
            ]),
            ConversationTurn::tool_results(vec![ToolResult::success("toolu_1", "none")]),
        ];
        let messages = to_genai_messages(&history).unwrap();
        let roles: Vec<_> = messages.iter().map(|m| m.role.clone()).collect();
        assert!(matches!(roles.as_slice(), [ChatRole::User, ChatRole::Assistant, ChatRole::Tool]));
    }

    #[test]
    fn test_tool_call_conversion() {
        let call = ToolCall::new("toolu_9", "get_exception_summary", json!({"days": 7}));
        let genai_call = to_genai_tool_call(&call).unwrap();
        assert_eq!(genai_call.call_id, "toolu_9");
        assert_eq!(genai_call.fn_name, "get_exception_summary");
        assert_eq!(from_genai_tool_call(&genai_call), call);
    }

    #[test]
    fn test_response_keeps_part_order() {
        let call = to_genai_tool_call(&ToolCall::new("toolu_1", "detect_exceptions", json!({}))).unwrap();
        let content = GenaiContent::from_parts(vec![
            GenaiPart::ToolCall(call),
            GenaiPart::Text("Here is what I found after the call.".to_string()),
            GenaiPart::Text(String::new()),
        ]);

        let blocks = from_genai_content(&content);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].as_tool_call().map(|c| c.id.as_str()), Some("toolu_1"));
        assert_eq!(blocks[1], ContentBlock::text("Here is what I found after the call."));
    }

    #[test]
    fn test_tool_conversion() {
        let tool = ModelTool {
            name: "detect_exceptions".to_string(),
            description: "Find overdue shipments".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        };
        let genai_tool = to_genai_tool(&tool);
        assert_eq!(genai_tool.name, "detect_exceptions");
    }

    #[test]
    fn test_provider_support() {
        assert!(is_genai_supported("anthropic"));
        assert!(is_genai_supported("OpenAI"));
        assert!(!is_genai_supported("mock"));
        assert_eq!(provider_to_secret_key("gemini"), "google");
        assert_eq!(provider_to_secret_key("anthropic"), "anthropic");
    }
}
