//! User-facing message text

/// Tool result content recorded when a tool needs authorization
pub const AUTH_REQUIRED_RESULT: &str =
    "Authorization required. The user has been shown an authorization link.";

pub const CONNECTION_FAILED: &str =
    "Failed to connect to the Gateway. Check that the URL and API key are configured.";

/// Shown when a tool needs the user to grant access out of band
pub fn authorization_prompt(tool_name: &str, url: &str) -> String {
    format!(
        "**{}** needs access to your account.\n\n[Click here to authorize]({})\n\nOnce authorized, try your request again.",
        tool_name, url
    )
}

/// Shown when a tool invocation failed with an authorization-looking error
pub fn authorization_error_prompt(error_text: &str, url: Option<&str>) -> String {
    match url {
        Some(url) => format!(
            "This action requires authorization. Please click the link below to connect your account:\n\n[Authorize]({})\n\nOnce authorized, try your request again.",
            url
        ),
        None => format!(
            "This action requires authorization. Please check your Arcade account to connect the required service, then try again.\n\nDetails: {}",
            error_text
        ),
    }
}

pub fn error_result(text: &str) -> String {
    format!("Error: {}", text)
}

pub fn round_limit_reached(rounds: usize) -> String {
    format!("I wasn't able to complete this after {} tool rounds.", rounds)
}

pub const WELCOME: &str =
    "Welcome to **All Points Operations Intelligence**.\n\nEnter your email to get started:";

pub const IDENTIFICATION_TIMED_OUT: &str = "Session timed out. Please refresh to try again.";

pub const CONNECTING: &str = "Connecting to All Points systems...";

/// Tool-step output while a tool waits for authorization
pub const AUTH_REQUIRED_STEP: &str = "Authorization required";

pub fn connected(tool_count: usize) -> String {
    format!(
        "Connected: **{} tools** available across shipping, billing, compliance, and more.\n\nHow can I help?",
        tool_count
    )
}

pub fn connection_failed(error: &str) -> String {
    format!("{}\n\n`{}`", CONNECTION_FAILED, error)
}

/// Cut `text` to at most `limit` characters, noting how many were dropped
pub fn truncate_for_display(text: &str, limit: usize) -> String {
    let total = text.chars().count();
    if total <= limit {
        return text.to_string();
    }

    let kept: String = text.chars().take(limit).collect();
    format!("{}\n\n... ({} chars truncated)", kept, total - limit)
}
