//! System keychain secret store
//!
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use keyring::Entry;

use super::traits::{SecretStore, SecretStoreError, SecretStoreResult};

pub const DEFAULT_SERVICE: &str = "opsbridge";

/// Persistent store backed by the OS keychain
///
/// # Example
///
/// ```no_run
/// use opsbridge_core::secrets::{KeychainSecretStore, SecretStore};
///
/// let store = KeychainSecretStore::new();
/// store.store("gateway", "arc_...").unwrap();
/// assert!(store.get("gateway").is_some());
/// ```
#[derive(Debug)]
pub struct KeychainSecretStore {
    service_name: String,
}

impl KeychainSecretStore {
    pub fn new() -> Self {
        Self::with_service(DEFAULT_SERVICE)
    }

    /// Secrets are namespaced by service, e.g. `opsbridge:gateway`
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service_name: service.into(),
        }
    }

    fn entry(&self, key: &str) -> SecretStoreResult<Entry> {
        Entry::new(&self.service_name, key)
            .map_err(|e| SecretStoreError::Other(format!("Failed to create keychain entry: {}", e)))
    }
}

impl Default for KeychainSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeychainSecretStore {
    fn name(&self) -> &str {
        "keychain"
    }

    fn is_available(&self) -> bool {
        match Entry::new(&self.service_name, "__opsbridge_availability_check__") {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(service = %self.service_name, error = %e, "keychain unavailable");
                false
            }
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        let entry = match self.entry(key) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, error = %e, "keychain entry creation failed");
                return None;
            }
        };

        match entry.get_password() {
            Ok(password) => Some(password),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "keychain read failed");
                None
            }
        }
    }

    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()> {
        tracing::info!(key, service = %self.service_name, "storing secret in keychain");
        self.entry(key)?
            .set_password(value)
            .map_err(|e| SecretStoreError::Other(format!("Failed to store in keychain: {}", e)))?;

        // Read back through a fresh entry so a cached handle can't mask a failed write
        match self.entry(key)?.get_password() {
            Ok(stored) if stored == value => Ok(()),
            Ok(_) => Err(SecretStoreError::Other(
                "Keychain store verification failed: value mismatch".to_string(),
            )),
            Err(e) => Err(SecretStoreError::Other(format!(
                "Keychain store verification failed: {}",
                e
            ))),
        }
    }

    fn delete(&self, key: &str) -> SecretStoreResult<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SecretStoreError::Other(format!("Failed to delete from keychain: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(KeychainSecretStore::new().name(), "keychain");
    }

    #[test]
    #[ignore] // Requires system keychain
    fn test_store_and_get() {
        let store = KeychainSecretStore::with_service("opsbridge-test");
        let _ = store.delete("gateway");

        store.store("gateway", "arc_test").unwrap();
        assert_eq!(store.get("gateway"), Some("arc_test".to_string()));

        store.delete("gateway").unwrap();
        assert_eq!(store.get("gateway"), None);
    }
}
