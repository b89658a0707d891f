//! # Cache Store
//!
//! Write-buffering branch over a read-only parent. Reads fall through to the
//! parent unless the key was written in the branch. The buffered writes are
//! handed back as one batch for the parent's `atomic_batch_write`, or dropped
//! with the branch.

use crate::error::KVStoreError;
use crate::ports::outbound::{BatchOperation, KeyValueStore, KvReader};
use std::collections::BTreeMap;

pub struct CacheStore<'p, P: KvReader + ?Sized> {
    parent: &'p P,
    /// `None` marks a deletion.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'p, P: KvReader + ?Sized> CacheStore<'p, P> {
    pub fn new(parent: &'p P) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.writes.is_empty()
    }

    /// Buffered writes in key order.
    pub fn into_batch(self) -> Vec<BatchOperation> {
        self.writes
            .into_iter()
            .map(|(key, value)| match value {
                Some(value) => BatchOperation::Put { key, value },
                None => BatchOperation::Delete { key },
            })
            .collect()
    }
}

impl<'p, P: KvReader + ?Sized> KvReader for CacheStore<'p, P> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        match self.writes.get(key) {
            Some(value) => Ok(value.clone()),
            None => self.parent.get(key),
        }
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        match self.writes.get(key) {
            Some(value) => Ok(value.is_some()),
            None => self.parent.exists(key),
        }
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, KVStoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.parent.prefix_scan(prefix)?.into_iter().collect();
        for (key, value) in self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
        {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        Ok(merged.into_iter().collect())
    }
}

impl<'p, P: KvReader + ?Sized> KeyValueStore for CacheStore<'p, P> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => {
                    self.writes.insert(key, Some(value));
                }
                BatchOperation::Delete { key } => {
                    self.writes.insert(key, None);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryKVStore;

    #[test]
    fn test_reads_fall_through_until_written() {
        let mut parent = InMemoryKVStore::new();
        parent.put(b"a", b"parent").unwrap();

        let mut cache = CacheStore::new(&parent);
        assert_eq!(cache.get(b"a").unwrap(), Some(b"parent".to_vec()));
        cache.put(b"a", b"branch").unwrap();
        assert_eq!(cache.get(b"a").unwrap(), Some(b"branch".to_vec()));
        assert_eq!(parent.get(b"a").unwrap(), Some(b"parent".to_vec()));
    }

    #[test]
    fn test_delete_hides_parent_entry() {
        let mut parent = InMemoryKVStore::new();
        parent.put(&[0, 1], b"x").unwrap();
        parent.put(&[0, 2], b"y").unwrap();

        let mut cache = CacheStore::new(&parent);
        cache.delete(&[0, 1]).unwrap();
        cache.put(&[0, 3], b"z").unwrap();

        assert!(!cache.exists(&[0, 1]).unwrap());
        let keys: Vec<_> = cache
            .prefix_scan(&[0])
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![vec![0, 2], vec![0, 3]]);
    }

    #[test]
    fn test_commit_applies_batch() {
        let mut parent = InMemoryKVStore::new();
        parent.put(b"old", b"1").unwrap();

        let batch = {
            let mut cache = CacheStore::new(&parent);
            cache.put(b"new", b"2").unwrap();
            cache.delete(b"old").unwrap();
            assert!(cache.is_dirty());
            cache.into_batch()
        };
        parent.atomic_batch_write(batch).unwrap();

        assert_eq!(parent.get(b"new").unwrap(), Some(b"2".to_vec()));
        assert!(!parent.exists(b"old").unwrap());
    }
}
