//! # Evidence Store
//!
//! Evidence records keyed by hash under a single-byte prefix:
//!
//! ```text
//! 0x00 || hash[32]  →  bincode(EvidenceEnvelope)
//! ```
//!
//! Iteration follows the underlying key order, i.e. ascending hash. A record
//! that fails to decode is corruption and is reported as a fatal error, never
//! skipped.

use crate::domain::{decode_evidence, encode_evidence, Evidence};
use crate::error::{EvidenceError, EvidenceResult};
use crate::ports::outbound::{KeyValueStore, KvReader};
use shared_types::{paginate, Hash, PageLimits, PageRequest, PageResponse, HASH_LENGTH};
use std::ops::ControlFlow;

/// Key prefix for evidence records.
pub const KEY_PREFIX_EVIDENCE: u8 = 0x00;

pub fn evidence_key(hash: &Hash) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + HASH_LENGTH);
    key.push(KEY_PREFIX_EVIDENCE);
    key.extend_from_slice(hash);
    key
}

fn hash_from_key(key: &[u8]) -> EvidenceResult<Hash> {
    match key.split_first() {
        Some((&KEY_PREFIX_EVIDENCE, rest)) => rest.try_into().map_err(|_| {
            EvidenceError::corrupted(format!("evidence key has length {}", key.len()))
        }),
        _ => Err(EvidenceError::corrupted("evidence key outside prefix")),
    }
}

/// Typed view over a key-value store.
pub struct EvidenceStore<S> {
    kv: S,
}

impl<S: KvReader> EvidenceStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Point lookup. `None` when absent.
    pub fn get(&self, hash: &Hash) -> EvidenceResult<Option<Evidence>> {
        match self.kv.get(&evidence_key(hash))? {
            Some(bytes) => decode_evidence(&bytes).map(Some),
            None => Ok(None),
        }
    }

    pub fn has(&self, hash: &Hash) -> EvidenceResult<bool> {
        Ok(self.kv.exists(&evidence_key(hash))?)
    }

    /// Visit records in ascending hash order until `f` breaks.
    pub fn iterate<F>(&self, mut f: F) -> EvidenceResult<()>
    where
        F: FnMut(&Hash, Evidence) -> ControlFlow<()>,
    {
        for (key, value) in self.kv.prefix_scan(&[KEY_PREFIX_EVIDENCE])? {
            let hash = hash_from_key(&key)?;
            let evidence = decode_evidence(&value)?;
            if f(&hash, evidence).is_break() {
                break;
            }
        }
        Ok(())
    }

    /// Every record, ascending by hash.
    pub fn all(&self) -> EvidenceResult<Vec<Evidence>> {
        let mut out = Vec::new();
        self.iterate(|_, evidence| {
            out.push(evidence);
            ControlFlow::Continue(())
        })?;
        Ok(out)
    }

    /// One page of records. `next_key` is the hash of the first record
    /// after the page.
    pub fn paginate(
        &self,
        request: Option<&PageRequest>,
        limits: PageLimits,
    ) -> EvidenceResult<(Vec<Evidence>, PageResponse)> {
        let entries = self
            .kv
            .prefix_scan(&[KEY_PREFIX_EVIDENCE])?
            .into_iter()
            .map(|(key, value)| Ok((hash_from_key(&key)?.to_vec(), value)))
            .collect::<EvidenceResult<Vec<_>>>()?;

        let (page, response) = paginate(entries, request, limits)?;
        let records = page
            .iter()
            .map(|bytes| decode_evidence(bytes))
            .collect::<EvidenceResult<Vec<_>>>()?;
        Ok((records, response))
    }
}

impl<S: KeyValueStore> EvidenceStore<S> {
    /// Overwrites silently; callers check [`EvidenceStore::has`] first when
    /// duplicates matter.
    pub fn set(&mut self, hash: &Hash, evidence: &Evidence) -> EvidenceResult<()> {
        let bytes = encode_evidence(evidence)?;
        self.kv.put(&evidence_key(hash), &bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryKVStore;
    use crate::domain::{Equivocation, EvidenceRecord};
    use chrono::{DateTime, Utc};

    fn evidence(height: i64) -> Evidence {
        Equivocation::new(
            height,
            DateTime::<Utc>::from_timestamp(1_704_067_200, 0).unwrap(),
            100,
            "cosmosvalcons1qyqszqgpqyqszqgpqyqszqgpqyqszqgpr5xhdw",
        )
        .into()
    }

    fn populated(n: i64) -> InMemoryKVStore {
        let mut kv = InMemoryKVStore::new();
        let mut store = EvidenceStore::new(&mut kv);
        for height in 1..=n {
            let e = evidence(height);
            store.set(&e.hash(), &e).unwrap();
        }
        kv
    }

    #[test]
    fn test_set_get_has() {
        let mut kv = InMemoryKVStore::new();
        let mut store = EvidenceStore::new(&mut kv);
        let e = evidence(1);
        assert!(!store.has(&e.hash()).unwrap());
        assert_eq!(store.get(&e.hash()).unwrap(), None);

        store.set(&e.hash(), &e).unwrap();
        assert!(store.has(&e.hash()).unwrap());
        assert_eq!(store.get(&e.hash()).unwrap(), Some(e));
    }

    #[test]
    fn test_iterate_ascending_and_stoppable() {
        let kv = populated(6);
        let store = EvidenceStore::new(&kv);

        let mut hashes = Vec::new();
        store
            .iterate(|hash, _| {
                hashes.push(*hash);
                ControlFlow::Continue(())
            })
            .unwrap();
        assert_eq!(hashes.len(), 6);
        assert!(hashes.windows(2).all(|w| w[0] < w[1]));

        let mut seen = 0;
        store
            .iterate(|_, _| {
                seen += 1;
                if seen == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_paginate_walks_everything() {
        let kv = populated(5);
        let store = EvidenceStore::new(&kv);
        let limits = PageLimits {
            default_limit: 2,
            max_limit: 2,
        };

        let mut collected = Vec::new();
        let mut request = PageRequest::default();
        loop {
            let (page, response) = store.paginate(Some(&request), limits).unwrap();
            collected.extend(page);
            match response.next_key {
                Some(key) => {
                    assert_eq!(key.len(), HASH_LENGTH);
                    request = PageRequest {
                        key,
                        ..Default::default()
                    };
                }
                None => break,
            }
        }
        assert_eq!(collected, store.all().unwrap());
    }

    #[test]
    fn test_corrupted_value_is_fatal() {
        let mut kv = populated(2);
        let key = evidence_key(&evidence(1).hash());
        kv.put(&key, b"garbage").unwrap();

        let store = EvidenceStore::new(&kv);
        let err = store.all().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_malformed_key_is_fatal() {
        let mut kv = InMemoryKVStore::new();
        kv.put(&[KEY_PREFIX_EVIDENCE, 1, 2, 3], b"x").unwrap();
        let store = EvidenceStore::new(&kv);
        assert!(matches!(
            store.iterate(|_, _| ControlFlow::Continue(())),
            Err(EvidenceError::Corrupted { .. })
        ));
    }
}
