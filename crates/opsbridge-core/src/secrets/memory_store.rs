//! In-memory secret store

use std::collections::HashMap;

use parking_lot::RwLock;

use super::traits::{SecretStore, SecretStoreResult};

/// Read-write store that lives as long as the process; used in tests
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secrets<I, K, V>(initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            secrets: RwLock::new(
                initial
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.secrets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.secrets.read().get(key).cloned()
    }

    fn store(&self, key: &str, value: &str) -> SecretStoreResult<()> {
        self.secrets.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> SecretStoreResult<()> {
        self.secrets.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_get_delete() {
        let store = MemorySecretStore::new();
        assert!(store.is_empty());

        store.store("gateway", "arc_1").unwrap();
        assert_eq!(store.get("gateway"), Some("arc_1".to_string()));
        assert_eq!(store.len(), 1);

        store.delete("gateway").unwrap();
        assert!(!store.has("gateway"));
        store.delete("gateway").unwrap();
    }

    #[test]
    fn test_with_secrets() {
        let store = MemorySecretStore::with_secrets([("gateway", "arc_1"), ("anthropic", "sk-ant")]);
        assert_eq!(store.require("anthropic").unwrap(), "sk-ant");
        assert_eq!(store.get_info("gateway").source, "memory");
    }
}
