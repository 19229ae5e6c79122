//! Orchestration errors

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::providers::ProviderError;

/// Failures that end a turn early.
///
/// Tool failures are not here: they become error tool results and the
/// model decides what to do with them.
#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("Session not initialized. Please refresh and enter your email.")]
    SessionNotReady,

    #[error("Model did not answer within {seconds}s")]
    ModelTimeout { seconds: u64 },

    #[error("Model request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl OrchestrationError {
    /// Connection-class failures: the session should reconnect before retrying
    pub fn is_connection_error(&self) -> bool {
        match self {
            OrchestrationError::ModelTimeout { .. } => true,
            OrchestrationError::Gateway(e) => e.is_connection_error(),
            _ => false,
        }
    }
}

pub type OrchestrationResult<T> = Result<T, OrchestrationError>;
