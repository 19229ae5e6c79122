//! Secret storage
//!
//! API keys for the gateway and the model are looked up by logical name
//! (`gateway`, `anthropic`, ...) through a [`SecretStore`]. The CLI uses
//! [`ChainSecretStore::env_then_keychain`].

mod chain_store;
mod env_store;
mod keychain_store;
mod memory_store;
mod traits;

pub use chain_store::ChainSecretStore;
pub use env_store::EnvSecretStore;
pub use keychain_store::KeychainSecretStore;
pub use memory_store::MemorySecretStore;
pub use traits::{SecretInfo, SecretStore, SecretStoreError, SecretStoreResult};

/// Logical name of the gateway API key
pub const GATEWAY_SECRET: &str = "gateway";
