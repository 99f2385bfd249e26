//! In-process store, used for tests and ephemeral deployments.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use super::{KvStore, WriteOp};
use crate::Result;

/// Map-backed [`KvStore`]. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .data
            .read()
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        self.data
            .write()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<bool> {
        Ok(self
            .data
            .write()
            .get_mut(namespace)
            .is_some_and(|ns| ns.remove(key).is_some()))
    }

    fn entries(&self, namespace: &str) -> Result<Vec<(String, String)>> {
        Ok(self
            .data
            .read()
            .get(namespace)
            .map(|ns| ns.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }

    fn write_batch(&self, ops: Vec<WriteOp>) -> Result<()> {
        let mut data = self.data.write();
        for op in ops {
            match op {
                WriteOp::Put {
                    namespace,
                    key,
                    value,
                } => {
                    data.entry(namespace.to_string())
                        .or_default()
                        .insert(key, value);
                }
                WriteOp::Delete { namespace, key } => {
                    if let Some(ns) = data.get_mut(namespace) {
                        ns.remove(&key);
                    }
                }
            }
        }
        Ok(())
    }

    fn update(
        &self,
        namespace: &str,
        key: &str,
        f: &mut dyn FnMut(Option<&str>) -> Option<String>,
    ) -> Result<Option<String>> {
        let mut data = self.data.write();
        let ns = data.entry(namespace.to_string()).or_default();
        match f(ns.get(key).map(String::as_str)) {
            Some(next) => {
                ns.insert(key.to_string(), next.clone());
                Ok(Some(next))
            }
            None => Ok(ns.get(key).cloned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::exercise_store;

    #[test]
    fn test_memory_store_contract() {
        exercise_store(&MemoryStore::new());
    }

    #[test]
    fn test_entries_of_unknown_namespace_is_empty() {
        let store = MemoryStore::new();
        assert!(store.entries("missing").unwrap().is_empty());
    }
}
