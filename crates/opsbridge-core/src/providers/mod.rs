//! Conversational model providers
//!
//! The orchestration loop talks to the model through the [`Provider`] trait.
//! Real traffic goes through `genai` ([`GenaiProvider`]); [`MockProvider`]
//! replays scripted replies for tests.

mod error;
mod genai_adapter;
mod genai_provider;
mod mock;
mod traits;

pub use error::{ProviderError, ProviderResult};
pub use genai_adapter::{is_genai_supported, provider_to_secret_key};
pub use genai_provider::GenaiProvider;
pub use mock::{MockConfig, MockMode, MockProvider, RecordedRequest};
pub use traits::{ModelRequest, Provider, ProviderModelConfig};

use crate::logging::Logger;
use std::sync::Arc;

/// Create a provider for the given provider ID
///
/// `mock` yields an echoing [`MockProvider`]; anything else goes through genai.
pub fn create_provider(provider_id: &str, logger: Arc<dyn Logger>) -> Arc<dyn Provider> {
    match provider_id.to_lowercase().as_str() {
        "mock" => Arc::new(MockProvider::echo(logger)),
        _ => Arc::new(GenaiProvider::new(provider_id, logger)),
    }
}
