//! Outbound messages to the human-facing surface

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

/// Something the user should see during a turn
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    /// Model text, interim or final
    Text(String),
    /// An authorization link (or instructions) the user must act on
    Authorization {
        tool: String,
        url: Option<String>,
        text: String,
    },
    /// One executed tool, with its output cut for display
    ToolStep {
        tool: String,
        input: Value,
        output: String,
        is_error: bool,
    },
    /// Status from the loop itself
    Notice(String),
}

impl OutboundMessage {
    /// Rendered body, as a terminal would print it
    pub fn text(&self) -> &str {
        match self {
            OutboundMessage::Text(text) | OutboundMessage::Notice(text) => text,
            OutboundMessage::Authorization { text, .. } => text,
            OutboundMessage::ToolStep { output, .. } => output,
        }
    }
}

#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, message: OutboundMessage);
}

/// Keeps every message; handy for tests and for batch front ends
#[derive(Debug, Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<OutboundMessage>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.messages.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter_map(|m| match m {
                OutboundMessage::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn authorizations(&self) -> Vec<OutboundMessage> {
        self.messages
            .lock()
            .iter()
            .filter(|m| matches!(m, OutboundMessage::Authorization { .. }))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MessageSink for CollectingSink {
    async fn send(&self, message: OutboundMessage) {
        self.messages.lock().push(message);
    }
}
