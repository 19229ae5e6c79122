//! Gateway client
//!
//! One authenticated, per-user connection to the remote tool gateway.
//! The gateway speaks MCP over Streamable HTTP; every operation opens its
//! own transport session, performs the handshake, and closes it again.
//!
//! # Example
//!
//! ```rust,ignore
//! use opsbridge_core::gateway::GatewayClient;
//!
//! let gateway = GatewayClient::connect(&settings.gateway, &api_key, "ops@allpoints.example", logger)?;
//!
//! // Discover (and cache) the catalog
//! let tools = gateway.discover_tools().await?;
//! let model_tools = GatewayClient::to_model_tool_format(&tools);
//!
//! // Call a tool
//! let result = gateway.call_tool("detect_exceptions", json!({})).await?;
//! if result.needs_auth {
//!     println!("authorize at {}", result.auth_url.unwrap_or_default());
//! }
//! ```

mod client;
mod error;
pub mod elicitation;
mod response;
mod transport;

pub use client::GatewayClient;
pub use error::{GatewayError, GatewayResult};
pub use response::{normalize_response, RawContentBlock, RawToolResponse, ToolCallResult, ToolOutcome};
pub use transport::{GatewayTransport, RmcpTransport, USER_ID_HEADER};
