// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Allowlist Storage
//!
//! The eligibility resolver only ever needs one capability: "give me the
//! record for this canonical address, if any". That capability is the
//! [`RecordStore`] trait. Everything else here is an implementation of it.
//!
//! ## Implementations
//!
//! - [`AllowlistDatabase`]: embedded redb file, the production store
//! - [`InMemoryStore`]: map-backed store for tests and local runs
//! - [`CachedRecordStore`]: optional LRU read-through cache in front of
//!   either of the above
//!
//! ## Important Notes
//!
//! - Lookups are read-only. Writes happen through the admin tool
//!   (`crate::admin`) directly against [`AllowlistDatabase`].
//! - redb locks the database file while it is open. Stop the service before
//!   running admin commands against the same file.
//! - No retries happen at this layer; a failed lookup is reported once.

pub mod allowlist_db;
pub mod cache;
pub mod memory;
pub mod record;

use async_trait::async_trait;

use crate::address::CanonicalAddress;

pub use allowlist_db::{AllowlistDatabase, AllowlistDbError, AllowlistDbResult};
pub use cache::CachedRecordStore;
pub use memory::InMemoryStore;
pub use record::{AllowlistRecord, AllowlistStats, UpsertOutcome};

/// Failure while reading from a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("allowlist database error: {0}")]
    Database(#[from] AllowlistDbError),

    #[error("allowlist store unavailable: {0}")]
    Unavailable(String),
}

/// Read capability consumed by the eligibility resolver.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the record for a canonical address.
    async fn find_by_key(&self, key: &CanonicalAddress) -> Result<Option<AllowlistRecord>, StoreError>;
}

/// Store that can also report aggregate counts and its own health.
#[async_trait]
pub trait AllowlistStore: RecordStore {
    /// Count every record. Reads the whole store.
    async fn stats(&self) -> Result<AllowlistStats, StoreError>;

    /// Cheap reachability check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}
