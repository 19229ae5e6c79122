//! One chat connection's state

use crate::gateway::{GatewayClient, GatewayResult};
use crate::types::{ConversationTurn, ToolDefinition};

/// Per-connection state: the user's gateway client (and its tool cache)
/// plus the conversation so far.
///
/// History only grows. It is dropped with the session.
#[derive(Debug)]
pub struct ChatSession {
    gateway: GatewayClient,
    history: Vec<ConversationTurn>,
    connected: bool,
}

impl ChatSession {
    pub fn new(gateway: GatewayClient) -> Self {
        Self {
            gateway,
            history: Vec::new(),
            connected: false,
        }
    }

    /// Discover tools; the session accepts messages once this returns a
    /// non-empty catalog
    pub async fn connect(&mut self) -> GatewayResult<Vec<ToolDefinition>> {
        let tools = self.gateway.discover_tools().await?;
        self.connected = !tools.is_empty();
        Ok(tools)
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn user_id(&self) -> &str {
        self.gateway.user_id()
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Force tool re-discovery on the next message
    pub fn invalidate_tools(&self) {
        self.gateway.invalidate_cache();
    }

    pub(crate) fn push(&mut self, turn: ConversationTurn) {
        self.history.push(turn);
    }
}
