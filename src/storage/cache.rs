// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU read-through cache for allowlist lookups.
//!
//! Sits between the eligibility resolver and a store. Both hits and misses
//! are cached for `ttl`; store errors are never cached. The running service
//! holds the only handle on the allowlist database, so records cannot change
//! underneath the cache; the TTL only bounds how long an entry stays resident.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;

use super::record::{AllowlistRecord, AllowlistStats};
use super::{AllowlistStore, RecordStore, StoreError};
use crate::address::CanonicalAddress;

/// Cached entry: lookup result + insertion timestamp.
struct CacheEntry {
    record: Option<AllowlistRecord>,
    inserted_at: Instant,
}

/// Caching wrapper around another store.
pub struct CachedRecordStore<S> {
    inner: S,
    cache: Mutex<LruCache<CanonicalAddress, CacheEntry>>,
    ttl: Duration,
}

impl<S> CachedRecordStore<S> {
    /// Wrap `inner` with a cache of `capacity` addresses, each valid for `ttl`.
    pub fn new(inner: S, capacity: usize, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop the cached entry for one address.
    pub fn invalidate(&self, key: &CanonicalAddress) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.pop(key);
        }
    }

    fn cached(&self, key: &CanonicalAddress) -> Option<Option<AllowlistRecord>> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.record.clone());
            }
            // Expired
            cache.pop(key);
        }
        None
    }

    fn remember(&self, key: &CanonicalAddress, record: Option<AllowlistRecord>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                key.clone(),
                CacheEntry {
                    record,
                    inserted_at: Instant::now(),
                },
            );
        }
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for CachedRecordStore<S> {
    async fn find_by_key(&self, key: &CanonicalAddress) -> Result<Option<AllowlistRecord>, StoreError> {
        if let Some(record) = self.cached(key) {
            tracing::trace!(address = %key, "allowlist cache hit");
            return Ok(record);
        }

        let record = self.inner.find_by_key(key).await?;
        self.remember(key, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl<S: AllowlistStore> AllowlistStore for CachedRecordStore<S> {
    async fn stats(&self) -> Result<AllowlistStats, StoreError> {
        self.inner.stats().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}
