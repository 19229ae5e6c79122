//! Raw `tools/call` responses and their normalized form

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::elicitation::extract_auth_url;

/// A `tools/call` result as it arrives on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawToolResponse {
    /// Protocol-level metadata (`_meta`)
    #[serde(rename = "_meta", alias = "meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    /// Optional structured payload
    #[serde(rename = "structuredContent", default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    /// Ordered content blocks
    #[serde(default)]
    pub content: Vec<RawContentBlock>,
    /// Whether the tool reported failure
    #[serde(rename = "isError", default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl RawToolResponse {
    /// Re-read an rmcp result through its wire representation
    pub fn from_call_result(result: &rmcp::model::CallToolResult) -> serde_json::Result<Self> {
        serde_json::to_value(result).and_then(serde_json::from_value)
    }
}

/// One content block of a tool response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContentBlock {
    #[serde(rename = "type")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text".to_string(),
            text: Some(text.into()),
            extra: Map::new(),
        }
    }

    /// Text blocks render as their text, anything else as its JSON
    fn render(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => serde_json::to_string(self).unwrap_or_else(|_| format!("[{} block]", self.content_type)),
        }
    }
}

/// Normalized outcome of one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCallResult {
    pub text: String,
    pub is_error: bool,
    pub needs_auth: bool,
    pub auth_url: Option<String>,
}

impl ToolCallResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn authorization_required(tool_name: &str, url: impl Into<String>) -> Self {
        Self {
            text: format!("Authorization required for {}.", tool_name),
            is_error: false,
            needs_auth: true,
            auth_url: Some(url.into()),
        }
    }

    /// Resolve the flags into one outcome. Authorization beats a generic error.
    pub fn outcome(&self) -> ToolOutcome {
        if self.needs_auth {
            return ToolOutcome::AuthorizationRequired {
                url: self.auth_url.clone().unwrap_or_default(),
            };
        }
        if self.is_error {
            ToolOutcome::Failed {
                message: self.text.clone(),
            }
        } else {
            ToolOutcome::Succeeded {
                text: self.text.clone(),
            }
        }
    }
}

/// Typed view of a [`ToolCallResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The human must visit `url` before the tool can run
    AuthorizationRequired { url: String },
    /// The tool ran and reported failure
    Failed { message: String },
    /// The tool ran
    Succeeded { text: String },
}

/// Turn a raw response into a [`ToolCallResult`].
///
/// Authorization detection runs first and ignores `isError` entirely.
pub fn normalize_response(tool_name: &str, response: &RawToolResponse) -> ToolCallResult {
    if let Some(url) = extract_auth_url(response) {
        return ToolCallResult::authorization_required(tool_name, url);
    }

    if response.content.is_empty() {
        return ToolCallResult::default();
    }

    let text = response
        .content
        .iter()
        .map(RawContentBlock::render)
        .collect::<Vec<_>>()
        .join("\n");

    ToolCallResult {
        text,
        is_error: response.is_error.unwrap_or(false),
        needs_auth: false,
        auth_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_metadata_overrides_error_flag() {
        for is_error in [Some(true), Some(false), None] {
            let response = RawToolResponse {
                meta: json!({"authorization_url": "https://auth.example/x"}).as_object().cloned(),
                content: vec![RawContentBlock::text("denied")],
                is_error,
                ..Default::default()
            };
            let result = normalize_response("gmail_send", &response);
            assert!(result.needs_auth);
            assert_eq!(result.auth_url.as_deref(), Some("https://auth.example/x"));
            assert_eq!(result.text, "Authorization required for gmail_send.");
        }
    }

    #[test]
    fn test_empty_content_is_empty_success() {
        let result = normalize_response("noop", &RawToolResponse::default());
        assert_eq!(result, ToolCallResult::default());
        assert_eq!(result.outcome(), ToolOutcome::Succeeded { text: String::new() });
    }

    #[test]
    fn test_blocks_join_one_per_line() {
        let response = RawToolResponse {
            content: vec![
                RawContentBlock::text(r#"{"late": 3}"#),
                RawContentBlock::text(r#"{"damaged": 1}"#),
            ],
            is_error: Some(false),
            ..Default::default()
        };
        let result = normalize_response("detect_exceptions", &response);
        assert_eq!(result.text, "{\"late\": 3}\n{\"damaged\": 1}");
        assert!(!result.is_error);
    }

    #[test]
    fn test_error_flag_propagates() {
        let response = RawToolResponse {
            content: vec![RawContentBlock::text("unknown carrier code")],
            is_error: Some(true),
            ..Default::default()
        };
        let result = normalize_response("get_carrier", &response);
        assert_eq!(
            result.outcome(),
            ToolOutcome::Failed {
                message: "unknown carrier code".to_string()
            }
        );
    }

    #[test]
    fn test_non_text_block_renders_as_json() {
        let response: RawToolResponse = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "chart attached"},
                {"type": "image", "data": "aGk=", "mimeType": "image/png"}
            ]
        }))
        .unwrap();
        let result = normalize_response("render_chart", &response);
        let mut lines = result.text.lines();
        assert_eq!(lines.next(), Some("chart attached"));
        let image: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(image["type"], "image");
        assert_eq!(image["mimeType"], "image/png");
    }

    #[test]
    fn test_wire_deserialization() {
        let response: RawToolResponse = serde_json::from_value(json!({
            "_meta": {"url": "https://auth.example/m"},
            "structuredContent": {"mode": "url", "url": "https://auth.example/s"},
            "content": [],
            "isError": true
        }))
        .unwrap();
        assert_eq!(response.is_error, Some(true));
        assert!(response.meta.is_some());
        assert!(response.structured_content.is_some());
    }
}
