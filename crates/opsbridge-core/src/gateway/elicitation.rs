//! Authorization-elicitation detection
//!
//! Gateways ask for out-of-band authorization through several channels
//! depending on version and transport. The structured channels are checked
//! first; the free-text scan is a legacy fallback and is kept behind
//! [`scan_text_for_auth_url`] so it can be dropped without touching callers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::response::RawToolResponse;

/// Metadata keys that carry an authorization URL, in precedence order
const META_URL_KEYS: [&str; 2] = ["url", "authorization_url"];

/// Words in an error message that indicate the failure was about authorization
const AUTH_ERROR_KEYWORDS: [&str; 6] = [
    "authorization",
    "authenticate",
    "oauth",
    "login",
    "auth_url",
    "authorization_url",
];

/// Free-text patterns, tried in order for every text block
static AUTH_URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"https?://accounts\.google\.com/o/oauth\S+",
        r"https?://\S*arcade\S*/auth\S*",
        r"https?://\S*oauth\S+authorize\S*",
        r"https?://login\.\S+",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("auth URL pattern is valid"))
    .collect()
});

static ANY_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));

/// Find an authorization URL in a raw `tools/call` response.
///
/// Order: `_meta.url`, `_meta.authorization_url`, `structuredContent.url`
/// when `structuredContent.mode == "url"`, then the text blocks.
pub fn extract_auth_url(response: &RawToolResponse) -> Option<String> {
    if let Some(meta) = &response.meta {
        if let Some(url) = META_URL_KEYS.iter().find_map(|key| string_field(meta, key)) {
            return Some(url);
        }
    }

    if let Some(Value::Object(structured)) = &response.structured_content {
        if structured.get("mode").and_then(Value::as_str) == Some("url") {
            if let Some(url) = string_field(structured, "url") {
                return Some(url);
            }
        }
    }

    response
        .content
        .iter()
        .filter_map(|block| block.text.as_deref())
        .filter(|text| !text.is_empty())
        .find_map(scan_text_for_auth_url)
}

/// Match free text against the known authorization URL shapes
pub fn scan_text_for_auth_url(text: &str) -> Option<String> {
    AUTH_URL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|found| trim_url(found.as_str()).to_string())
}

/// Whether an error message reads like an authorization failure
pub fn is_auth_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    AUTH_ERROR_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// First http(s) URL in a message, with trailing JSON punctuation removed
pub fn first_url(message: &str) -> Option<String> {
    ANY_URL
        .find(message)
        .map(|found| found.as_str().trim_end_matches(&['"', ',', '}'][..]).to_string())
}

fn trim_url(url: &str) -> &str {
    url.trim_end_matches(&['"', ',', '}', ')'][..])
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::response::RawContentBlock;
    use serde_json::json;

    fn text_response(text: &str) -> RawToolResponse {
        RawToolResponse {
            content: vec![RawContentBlock::text(text)],
            ..Default::default()
        }
    }

    #[test]
    fn test_meta_url_wins() {
        let response = RawToolResponse {
            meta: Some(json!({"authorization_url": "https://auth.example/a"}).as_object().cloned().unwrap()),
            structured_content: Some(json!({"mode": "url", "url": "https://auth.example/b"})),
            content: vec![RawContentBlock::text("https://login.example.com/c")],
            is_error: Some(true),
        };
        assert_eq!(extract_auth_url(&response).as_deref(), Some("https://auth.example/a"));
    }

    #[test]
    fn test_meta_url_key_before_authorization_url() {
        let response = RawToolResponse {
            meta: Some(
                json!({"authorization_url": "https://second", "url": "https://first"})
                    .as_object()
                    .cloned()
                    .unwrap(),
            ),
            ..Default::default()
        };
        assert_eq!(extract_auth_url(&response).as_deref(), Some("https://first"));
    }

    #[test]
    fn test_structured_content_requires_url_mode() {
        let mut response = RawToolResponse {
            structured_content: Some(json!({"mode": "url", "url": "https://accounts.google.com/o/oauth2/auth?x=1"})),
            ..Default::default()
        };
        assert_eq!(
            extract_auth_url(&response).as_deref(),
            Some("https://accounts.google.com/o/oauth2/auth?x=1")
        );

        response.structured_content = Some(json!({"mode": "form", "url": "https://example.com/form"}));
        assert_eq!(extract_auth_url(&response), None);

        response.structured_content = Some(json!({"url": "https://example.com/no-mode"}));
        assert_eq!(extract_auth_url(&response), None);
    }

    #[test]
    fn test_google_oauth_url_in_text_is_trimmed() {
        let response = text_response(
            r#"{"error": "needs auth", "authorize": "https://accounts.google.com/o/oauth2/v2/auth?client_id=abc&scope=gmail"}"#,
        );
        let url = extract_auth_url(&response).unwrap();
        assert_eq!(url, "https://accounts.google.com/o/oauth2/v2/auth?client_id=abc&scope=gmail");
        assert!(!url.ends_with('"'));
        assert!(!url.ends_with('}'));
        assert!(!url.ends_with(','));
    }

    #[test]
    fn test_other_text_patterns() {
        assert_eq!(
            scan_text_for_auth_url("visit https://cloud.arcade.dev/auth/start?id=7, then retry").as_deref(),
            Some("https://cloud.arcade.dev/auth/start?id=7")
        );
        assert_eq!(
            scan_text_for_auth_url("go to https://slack.com/oauth/v2/authorize?scope=chat)").as_deref(),
            Some("https://slack.com/oauth/v2/authorize?scope=chat")
        );
        assert_eq!(
            scan_text_for_auth_url("sign in at https://login.microsoftonline.com/common").as_deref(),
            Some("https://login.microsoftonline.com/common")
        );
        assert_eq!(scan_text_for_auth_url("see https://example.com/docs"), None);
    }

    #[test]
    fn test_plain_json_has_no_auth_url() {
        let response = text_response(r#"[{"shipment_id": "SH-1001", "status": "late"}]"#);
        assert_eq!(extract_auth_url(&response), None);
    }

    #[test]
    fn test_is_auth_error() {
        assert!(is_auth_error("OAuth token missing for gmail"));
        assert!(is_auth_error("Please AUTHENTICATE first"));
        assert!(is_auth_error("tool requires authorization_url flow"));
        assert!(!is_auth_error("connection reset by peer"));
    }

    #[test]
    fn test_first_url() {
        assert_eq!(
            first_url(r#"{"auth_url": "https://auth.example/start?x=1"}"#).as_deref(),
            Some("https://auth.example/start?x=1")
        );
        assert_eq!(first_url("no link here"), None);
    }
}
