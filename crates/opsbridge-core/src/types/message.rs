//! Conversation history types

use serde::{Deserialize, Serialize};

use super::tool::{ToolCall, ToolResult};

/// A block of assistant output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text meant for the user
    Text { text: String },
    /// The model asks for a tool to be invoked
    ToolUse(ToolCall),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: serde_json::Value) -> Self {
        ContentBlock::ToolUse(ToolCall::new(id, name, input))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::ToolUse(_) => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCall> {
        match self {
            ContentBlock::ToolUse(call) => Some(call),
            ContentBlock::Text { .. } => None,
        }
    }
}

/// One entry in the session history.
///
/// History is append-only and the model receives every turn, in order, on
/// every round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationTurn {
    /// Plain text from the human
    User { text: String },
    /// Ordered text and tool-use blocks from the model
    Assistant { blocks: Vec<ContentBlock> },
    /// Answers to the tool-use blocks of the preceding assistant turn
    ToolResults { results: Vec<ToolResult> },
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        ConversationTurn::User { text: text.into() }
    }

    pub fn assistant(blocks: Vec<ContentBlock>) -> Self {
        ConversationTurn::Assistant { blocks }
    }

    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        ConversationTurn::ToolResults { results }
    }

    /// Text blocks of an assistant turn, in order
    pub fn texts(&self) -> Vec<&str> {
        match self {
            ConversationTurn::Assistant { blocks } => {
                blocks.iter().filter_map(ContentBlock::as_text).collect()
            }
            ConversationTurn::User { text } => vec![text.as_str()],
            ConversationTurn::ToolResults { .. } => Vec::new(),
        }
    }

    /// Tool-use requests of an assistant turn, in the order the model emitted them
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        match self {
            ConversationTurn::Assistant { blocks } => {
                blocks.iter().filter_map(ContentBlock::as_tool_call).collect()
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assistant_turn_accessors() {
        let turn = ConversationTurn::assistant(vec![
            ContentBlock::text("Checking shipments."),
            ContentBlock::tool_use("toolu_1", "detect_exceptions", json!({})),
            ContentBlock::text("One moment."),
        ]);

        assert_eq!(turn.texts(), vec!["Checking shipments.", "One moment."]);
        let calls = turn.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "detect_exceptions");
    }

    #[test]
    fn test_tool_results_have_no_calls_or_text() {
        let turn = ConversationTurn::tool_results(vec![ToolResult::success("toolu_1", "[]")]);
        assert!(turn.tool_calls().is_empty());
        assert!(turn.texts().is_empty());
    }

    #[test]
    fn test_turn_serialization() {
        let turn = ConversationTurn::assistant(vec![ContentBlock::tool_use(
            "toolu_9",
            "get_exception_summary",
            json!({"days": 7}),
        )]);
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["kind"], "assistant");
        assert_eq!(value["blocks"][0]["type"], "tool_use");
        assert_eq!(value["blocks"][0]["name"], "get_exception_summary");
    }
}
