//! Per-user gateway client with a lazily populated tool catalog

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde_json::Value;

use super::error::GatewayResult;
use super::response::{normalize_response, ToolCallResult};
use super::transport::{GatewayTransport, RmcpTransport};
use crate::config::GatewaySettings;
use crate::logging::Logger;
use crate::types::{ModelTool, ToolDefinition};

/// Gateway client for one end user.
///
/// The API key authenticates the application; the user id isolates that
/// user's OAuth grants on the gateway.
pub struct GatewayClient {
    user_id: String,
    transport: Arc<dyn GatewayTransport>,
    /// Catalog from the last discovery, until invalidated
    tools_cache: RwLock<Option<Vec<ToolDefinition>>>,
    logger: Arc<dyn Logger>,
}

impl GatewayClient {
    /// Client over the real MCP transport
    pub fn connect(
        settings: &GatewaySettings,
        api_key: &str,
        user_id: impl Into<String>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let user_id = user_id.into();
        let transport = RmcpTransport::new(
            settings.url.clone(),
            api_key,
            user_id.clone(),
            Duration::from_secs(settings.timeout_secs),
            Arc::clone(&logger),
        );
        Self::with_transport(user_id, Arc::new(transport), logger)
    }

    /// Client over any transport
    pub fn with_transport(
        user_id: impl Into<String>,
        transport: Arc<dyn GatewayTransport>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            transport,
            tools_cache: RwLock::new(None),
            logger,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Return the cached catalog, or fetch and cache it
    pub async fn discover_tools(&self) -> GatewayResult<Vec<ToolDefinition>> {
        if let Some(tools) = self.tools_cache.read().as_ref() {
            return Ok(tools.clone());
        }

        let tools = match self.transport.list_tools().await {
            Ok(tools) => tools,
            Err(e) => {
                self.logger.error(&format!(
                    "[GatewayClient] Tool discovery failed for {}: {}",
                    self.user_id, e
                ));
                return Err(e);
            }
        };

        self.logger.info(&format!(
            "[GatewayClient] Discovered {} tools from {}",
            tools.len(),
            self.transport.endpoint()
        ));
        *self.tools_cache.write() = Some(tools.clone());
        Ok(tools)
    }

    /// Catalog from the last discovery, if any
    pub fn cached_tools(&self) -> Option<Vec<ToolDefinition>> {
        self.tools_cache.read().clone()
    }

    /// Force re-discovery on the next [`discover_tools`](Self::discover_tools)
    pub fn invalidate_cache(&self) {
        *self.tools_cache.write() = None;
    }

    /// Invoke one tool and normalize its response
    pub async fn call_tool(&self, name: &str, arguments: Value) -> GatewayResult<ToolCallResult> {
        self.logger.info(&format!("[GatewayClient] Calling tool: {}", name));

        let response = self.transport.call_tool(name, arguments).await?;
        let result = normalize_response(name, &response);

        if result.needs_auth {
            self.logger.info(&format!(
                "[GatewayClient] {} needs authorization for {}",
                name, self.user_id
            ));
        } else if result.is_error {
            self.logger.warn(&format!("[GatewayClient] {} reported an error", name));
        }
        Ok(result)
    }

    /// Convert gateway tool definitions to the model's tool shape
    pub fn to_model_tool_format(tools: &[ToolDefinition]) -> Vec<ModelTool> {
        tools
            .iter()
            .map(|tool| ModelTool {
                name: tool.name.clone(),
                description: tool.description.clone().unwrap_or_default(),
                input_schema: tool.input_schema.clone(),
            })
            .collect()
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("user_id", &self.user_id)
            .field("endpoint", &self.transport.endpoint())
            .field("cached_tools", &self.tools_cache.read().as_ref().map(Vec::len))
            .finish()
    }
}
