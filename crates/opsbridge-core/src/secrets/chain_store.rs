//! Chained secret store with fallback behavior

use std::sync::Arc;

use super::env_store::EnvSecretStore;
use super::keychain_store::KeychainSecretStore;
use super::traits::{SecretInfo, SecretStore, SecretStoreError, SecretStoreResult};

/// Reads try each store in order; writes go to one designated store
///
/// # Example
///
/// ```
/// use opsbridge_core::secrets::{SecretStore, ChainSecretStore, EnvSecretStore, MemorySecretStore};
/// use std::sync::Arc;
///
/// let memory = Arc::new(MemorySecretStore::new());
/// let chain = ChainSecretStore::new(vec![memory.clone(), Arc::new(EnvSecretStore::new())]).unwrap();
///
/// chain.store("gateway", "arc_test").unwrap();
/// assert_eq!(memory.get("gateway").as_deref(), Some("arc_test"));
/// ```
pub struct ChainSecretStore {
    stores: Vec<Arc<dyn SecretStore>>,
    write_store_index: usize,
}

impl ChainSecretStore {
    /// The first store receives writes
    pub fn new(stores: Vec<Arc<dyn SecretStore>>) -> SecretStoreResult<Self> {
        Self::with_write_store(stores, 0)
    }

    pub fn with_write_store(
        stores: Vec<Arc<dyn SecretStore>>,
        write_store_index: usize,
    ) -> SecretStoreResult<Self> {
        if stores.is_empty() {
            return Err(SecretStoreError::Other(
                "ChainSecretStore requires at least one store".to_string(),
            ));
        }
        if write_store_index >= stores.len() {
            return Err(SecretStoreError::Other(format!(
                "write store index {} out of bounds for {} stores",
                write_store_index,
                stores.len()
            )));
        }
        Ok(Self {
            stores,
            write_store_index,
        })
    }

    /// Environment first, then the keychain; writes go to the keychain
    pub fn env_then_keychain() -> Self {
        Self {
            stores: vec![
                Arc::new(EnvSecretStore::new()),
                Arc::new(KeychainSecretStore::new()),
            ],
            write_store_index: 1,
        }
    }

    pub fn stores(&self) -> &[Arc<dyn SecretStore>] {
        &self.stores
    }

    /// First available store holding `key`
    pub fn find_store(&self, key: &str) -> Option<&Arc<dyn SecretStore>> {
        self.stores
            .iter()
            .find(|store| store.is_available() && store.has(key))
    }
}

impl SecretStore for ChainSecretStore {
    fn name(&self) -> &str {
        "chain"
    }

    fn is_available(&self) -> bool {
        self.stores.iter().any(|s| s.is_available())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.stores
            .iter()
            .filter(|store| store.is_available())
            .find_map(|store| store.get(key))
    }

    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()> {
        self.stores[self.write_store_index].store(key, value)
    }

    /// Removes the key from every writable store that holds it
    fn delete(&self, key: &str) -> SecretStoreResult<()> {
        for store in &self.stores {
            if store.has(key) {
                match store.delete(key) {
                    Ok(()) | Err(SecretStoreError::ReadOnly) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(())
    }

    fn get_info(&self, key: &str) -> SecretInfo {
        self.find_store(key)
            .map(|store| SecretInfo::new(true, store.name()))
            .unwrap_or_else(SecretInfo::not_found)
    }
}

impl std::fmt::Debug for ChainSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.stores.iter().map(|s| s.name()).collect();
        f.debug_struct("ChainSecretStore")
            .field("stores", &names)
            .field("write_store_index", &self.write_store_index)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::MemorySecretStore;

    fn pair() -> (Arc<MemorySecretStore>, Arc<MemorySecretStore>) {
        (Arc::new(MemorySecretStore::new()), Arc::new(MemorySecretStore::new()))
    }

    #[test]
    fn test_fallback_and_priority() {
        let (first, second) = pair();
        second.store("gateway", "from_second").unwrap();
        let chain = ChainSecretStore::new(vec![first.clone(), second.clone()]).unwrap();
        assert_eq!(chain.get("gateway"), Some("from_second".to_string()));

        first.store("gateway", "from_first").unwrap();
        assert_eq!(chain.get("gateway"), Some("from_first".to_string()));
    }

    #[test]
    fn test_write_store() {
        let (first, second) = pair();
        let chain = ChainSecretStore::with_write_store(vec![first.clone(), second.clone()], 1).unwrap();

        chain.store("anthropic", "sk-ant").unwrap();
        assert_eq!(first.get("anthropic"), None);
        assert_eq!(second.get("anthropic"), Some("sk-ant".to_string()));
    }

    #[test]
    fn test_get_info_and_find_store() {
        let (first, second) = pair();
        second.store("gateway", "arc").unwrap();
        let chain = ChainSecretStore::new(vec![first, second]).unwrap();

        let info = chain.get_info("gateway");
        assert!(info.available);
        assert_eq!(info.source, "memory");
        assert!(chain.find_store("missing").is_none());
        assert!(!chain.get_info("missing").available);
    }

    #[test]
    fn test_delete_skips_read_only_stores() {
        std::env::set_var("OPSBRIDGE_CHAIN_DELETE_TEST", "env-value");
        let memory = Arc::new(MemorySecretStore::new());
        memory.store("OPSBRIDGE_CHAIN_DELETE_TEST", "mem-value").unwrap();
        let chain = ChainSecretStore::new(vec![memory.clone(), Arc::new(EnvSecretStore::new())]).unwrap();

        chain.delete("OPSBRIDGE_CHAIN_DELETE_TEST").unwrap();
        assert!(memory.is_empty());
        assert_eq!(chain.get("OPSBRIDGE_CHAIN_DELETE_TEST"), Some("env-value".to_string()));
        std::env::remove_var("OPSBRIDGE_CHAIN_DELETE_TEST");
    }

    #[test]
    fn test_invalid_construction() {
        assert!(ChainSecretStore::new(vec![]).is_err());
        let (first, _) = pair();
        assert!(ChainSecretStore::with_write_store(vec![first], 5).is_err());
    }
}
