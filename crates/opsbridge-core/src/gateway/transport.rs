//! MCP transport to the gateway, using the official rmcp SDK

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use rmcp::{
    model::{CallToolRequestParams, ClientCapabilities, ClientInfo, Implementation},
    service::RunningService,
    transport::{streamable_http_client::StreamableHttpClientTransportConfig, StreamableHttpClientTransport},
    RoleClient, ServiceExt,
};
use serde_json::Value;

use super::error::{GatewayError, GatewayResult};
use super::response::RawToolResponse;
use crate::logging::Logger;
use crate::types::ToolDefinition;

/// Header that isolates OAuth tokens per end user on the gateway
pub const USER_ID_HEADER: &str = "arcade-user-id";

/// The two protocol operations the gateway client needs.
///
/// Each call is self-contained: implementations must not assume a
/// connection survives between calls.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Gateway endpoint, for logs and error messages
    fn endpoint(&self) -> &str;

    /// `tools/list`
    async fn list_tools(&self) -> GatewayResult<Vec<ToolDefinition>>;

    /// `tools/call`
    async fn call_tool(&self, name: &str, arguments: Value) -> GatewayResult<RawToolResponse>;
}

/// Streamable HTTP transport authenticated with a bearer key and a user id
pub struct RmcpTransport {
    url: String,
    api_key: String,
    user_id: String,
    timeout: Duration,
    logger: Arc<dyn Logger>,
}

impl RmcpTransport {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        user_id: impl Into<String>,
        timeout: Duration,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            user_id: user_id.into(),
            timeout,
            logger,
        }
    }

    fn client_info() -> ClientInfo {
        ClientInfo {
            meta: None,
            protocol_version: Default::default(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation {
                name: "opsbridge-core".to_string(),
                title: Some("opsbridge".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                website_url: None,
                icons: None,
            },
        }
    }

    fn http_client(&self) -> GatewayResult<reqwest::Client> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| GatewayError::Connection(format!("invalid API key header: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);
        let user = HeaderValue::from_str(&self.user_id)
            .map_err(|e| GatewayError::Connection(format!("invalid user id header: {}", e)))?;
        headers.insert(HeaderName::from_static(USER_ID_HEADER), user);

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .map_err(|e| GatewayError::Connection(e.to_string()))
    }

    /// Open a transport session and run the MCP handshake
    async fn open(&self) -> GatewayResult<RunningService<RoleClient, ClientInfo>> {
        self.logger.debug(&format!("[RmcpTransport] Connecting to {}", self.url));

        let transport = StreamableHttpClientTransport::with_client(
            self.http_client()?,
            StreamableHttpClientTransportConfig::with_uri(self.url.clone()),
        );

        let session = Self::client_info()
            .serve(transport)
            .await
            .map_err(|e| GatewayError::Handshake(e.to_string()))?;

        self.logger.debug("[RmcpTransport] Session initialized");
        Ok(session)
    }

    async fn close(&self, session: RunningService<RoleClient, ClientInfo>) {
        if let Err(e) = session.cancel().await {
            self.logger.debug(&format!("[RmcpTransport] Session close failed: {}", e));
        }
    }
}

#[async_trait]
impl GatewayTransport for RmcpTransport {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn list_tools(&self) -> GatewayResult<Vec<ToolDefinition>> {
        let session = self.open().await?;
        let listed = session.list_tools(Default::default()).await;
        self.close(session).await;

        let result = listed.map_err(|e| GatewayError::Protocol(e.to_string()))?;
        Ok(result.tools.into_iter().map(ToolDefinition::from).collect())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> GatewayResult<RawToolResponse> {
        let session = self.open().await?;

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: arguments.as_object().cloned(),
            task: None,
        };
        let called = session.call_tool(params).await;
        self.close(session).await;

        let result = called.map_err(|e| GatewayError::ToolCall(e.to_string()))?;
        RawToolResponse::from_call_result(&result).map_err(|e| GatewayError::Protocol(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    fn transport(api_key: &str, user_id: &str) -> RmcpTransport {
        RmcpTransport::new(
            "https://gateway.example/mcp/allpoints-demo",
            api_key,
            user_id,
            Duration::from_secs(60),
            Arc::new(NoOpLogger),
        )
    }

    #[test]
    fn test_http_client_accepts_valid_headers() {
        let transport = transport("arc_test_key", "dispatch@allpoints.example");
        assert!(transport.http_client().is_ok());
        assert_eq!(transport.endpoint(), "https://gateway.example/mcp/allpoints-demo");
    }

    #[test]
    fn test_http_client_rejects_header_injection() {
        let transport = transport("arc_test_key", "bad\nuser");
        assert!(matches!(transport.http_client(), Err(GatewayError::Connection(_))));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_connection_class_error() {
        let transport = RmcpTransport::new(
            "http://127.0.0.1:9/mcp",
            "arc_test_key",
            "dispatch@allpoints.example",
            Duration::from_secs(2),
            Arc::new(NoOpLogger),
        );
        let err = transport.list_tools().await.unwrap_err();
        assert!(err.is_connection_error() || matches!(err, GatewayError::Protocol(_)));
    }
}
