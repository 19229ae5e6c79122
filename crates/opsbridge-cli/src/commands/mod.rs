pub mod chat;
pub mod probe;

use std::sync::Arc;

use anyhow::Context as _;
use opsbridge_core::config::{FileConfigProvider, Settings};
use opsbridge_core::logging::{ConsoleLogger, SharedLogger, TracingLogger};
use opsbridge_core::providers::provider_to_secret_key;
use opsbridge_core::secrets::{ChainSecretStore, SecretStore, GATEWAY_SECRET};

use crate::GlobalArgs;

/// Everything a command needs before it talks to the network
pub struct Context {
    pub settings: Settings,
    pub secrets: Arc<dyn SecretStore>,
    pub logger: SharedLogger,
}

impl Context {
    pub fn load(global: &GlobalArgs) -> anyhow::Result<Self> {
        let provider = match &global.config {
            Some(path) => FileConfigProvider::explicit(path),
            None => FileConfigProvider::user(),
        };

        let mut settings = provider
            .settings()
            .with_context(|| format!("loading {}", provider.path().display()))?
            .with_env_overrides()
            .context("applying environment overrides")?;
        if let Some(model_provider) = &global.provider {
            settings.model.provider = model_provider.clone();
        }

        let logger: SharedLogger = if global.console_log {
            Arc::new(ConsoleLogger::new())
        } else {
            Arc::new(TracingLogger::new("opsbridge"))
        };
        opsbridge_core::log_debug!(
            logger,
            "[cli] Config from {} ({})",
            provider.path().display(),
            if provider.exists() { "found" } else { "defaults" }
        );

        Ok(Self {
            settings,
            secrets: Arc::new(ChainSecretStore::env_then_keychain()),
            logger,
        })
    }

    pub fn gateway_key(&self) -> anyhow::Result<String> {
        self.secrets
            .require(GATEWAY_SECRET)
            .context("gateway API key not found; set ARCADE_API_KEY or store it in the keychain")
    }

    /// `None` lets the model client fall back to its own environment lookup
    pub fn model_key(&self) -> Option<String> {
        self.secrets.get(&provider_to_secret_key(&self.settings.model.provider))
    }
}
