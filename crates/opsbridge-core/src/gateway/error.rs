//! Gateway error types

use thiserror::Error;

/// Errors raised while talking to the gateway.
///
/// `Connection` and `Handshake` are the setup failures reported to the user
/// when discovery fails. Nothing here is retried by the client.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Handshake failed: {0}")]
    Handshake(String),

    #[error("Tool call failed: {0}")]
    ToolCall(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Gateway did not answer within {seconds}s")]
    Timeout { seconds: u64 },
}

impl GatewayError {
    /// Whether the error happened before a tool could run at all
    pub fn is_connection_error(&self) -> bool {
        matches!(self, GatewayError::Connection(_) | GatewayError::Handshake(_))
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
