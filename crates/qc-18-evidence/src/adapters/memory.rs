//! # In-Memory Store Adapter
//!
//! Ordered in-memory key-value store for tests and light nodes.

use crate::error::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, KvReader};
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
pub struct InMemoryKVStore {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KvReader for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        let results: Vec<_> = self
            .data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(results)
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.data.remove(key);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        // Single owner, nothing can observe a partial batch
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    self.data.insert(key, value);
                }
                BatchOperation::Delete { key } => {
                    self.data.remove(&key);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_delete() {
        let mut store = InMemoryKVStore::new();
        store.put(b"k", b"v").unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
        assert!(store.exists(b"k").unwrap());
        store.delete(b"k").unwrap();
        assert!(!store.exists(b"k").unwrap());
    }

    #[test]
    fn test_prefix_scan_is_ordered_and_bounded() {
        let mut store = InMemoryKVStore::new();
        store.put(&[0x00, 0x03], b"c").unwrap();
        store.put(&[0x00, 0x01], b"a").unwrap();
        store.put(&[0x01, 0x00], b"other").unwrap();
        store.put(&[0x00, 0x02], b"b").unwrap();

        let keys: Vec<_> = store
            .prefix_scan(&[0x00])
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![vec![0x00, 0x01], vec![0x00, 0x02], vec![0x00, 0x03]]);
    }

    #[test]
    fn test_atomic_batch_write() {
        let mut store = InMemoryKVStore::new();
        store.put(b"gone", b"x").unwrap();
        store
            .atomic_batch_write(vec![
                BatchOperation::put(b"a".to_vec(), b"1".to_vec()),
                BatchOperation::delete(b"gone".to_vec()),
            ])
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    }
}
