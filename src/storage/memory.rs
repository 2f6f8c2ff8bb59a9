// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Map-backed allowlist store.
//!
//! Used by `AppState::default()`, by tests, and when the service is started
//! without a database file.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::record::{AllowlistRecord, AllowlistStats};
use super::{AllowlistStore, RecordStore, StoreError};
use crate::address::CanonicalAddress;
use crate::roles::Role;

#[derive(Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<CanonicalAddress, AllowlistRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert for seeding.
    pub fn with_record(self, address: CanonicalAddress, role: impl Into<Role>) -> Self {
        self.insert(address, role);
        self
    }

    /// Insert or replace the record for an address.
    pub fn insert(&self, address: CanonicalAddress, role: impl Into<Role>) {
        let record = AllowlistRecord::new(address.clone(), role.into());
        self.write_records().insert(address, record);
    }

    pub fn len(&self) -> usize {
        self.read_records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every write is a single `insert`, so a poisoned map is still consistent.
    fn read_records(&self) -> RwLockReadGuard<'_, HashMap<CanonicalAddress, AllowlistRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_records(&self) -> RwLockWriteGuard<'_, HashMap<CanonicalAddress, AllowlistRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn find_by_key(&self, key: &CanonicalAddress) -> Result<Option<AllowlistRecord>, StoreError> {
        Ok(self.read_records().get(key).cloned())
    }
}

#[async_trait]
impl AllowlistStore for InMemoryStore {
    async fn stats(&self) -> Result<AllowlistStats, StoreError> {
        Ok(AllowlistStats::tally(self.read_records().values()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
