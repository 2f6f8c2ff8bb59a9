// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded allowlist database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `allowlist`: canonical wallet address → serialized AllowlistRecord (JSON bytes)
//!
//! Keys are always [`CanonicalAddress`] values, so case or whitespace
//! variants of one address can never produce two records.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::record::{AllowlistRecord, AllowlistStats, UpsertOutcome};
use super::{AllowlistStore, RecordStore, StoreError};
use crate::address::CanonicalAddress;
use crate::roles::Role;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: canonical address → serialized AllowlistRecord.
const ALLOWLIST: TableDefinition<&str, &[u8]> = TableDefinition::new("allowlist");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AllowlistDbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("wallet address already exists: {0}")]
    AlreadyExists(CanonicalAddress),

    #[error(
        "allowlist database {} is already open in another process; stop allowlist-checker before changing the allowlist",
        .0.display()
    )]
    Locked(PathBuf),
}

pub type AllowlistDbResult<T> = Result<T, AllowlistDbError>;

// =============================================================================
// AllowlistDatabase
// =============================================================================

/// Embedded ACID allowlist store.
pub struct AllowlistDatabase {
    db: Database,
}

impl AllowlistDatabase {
    /// Open (or create) the database at the given path.
    ///
    /// Safe to call on every start: the table is re-asserted each time.
    /// redb holds an exclusive lock on the file, so a second open (from the
    /// running service or another admin command) fails with `Locked`.
    pub fn open(path: &Path) -> AllowlistDbResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = match Database::create(path) {
            Ok(db) => db,
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AllowlistDbError::Locked(path.to_path_buf()))
            }
            Err(err) => return Err(err.into()),
        };

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ALLOWLIST)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Look up the record for an address.
    pub fn get(&self, address: &CanonicalAddress) -> AllowlistDbResult<Option<AllowlistRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ALLOWLIST)?;
        match table.get(address.as_str())? {
            Some(value) => {
                let record: AllowlistRecord = serde_json::from_slice(value.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Insert a new record. Fails with `AlreadyExists` if the address is present.
    pub fn insert(&self, address: &CanonicalAddress, role: &Role) -> AllowlistDbResult<()> {
        let record = AllowlistRecord::new(address.clone(), role.clone());
        let json = serde_json::to_vec(&record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ALLOWLIST)?;
            if table.get(address.as_str())?.is_some() {
                return Err(AllowlistDbError::AlreadyExists(address.clone()));
            }
            table.insert(address.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Set the role for an address, creating the record if needed.
    ///
    /// Existing records keep `created_at` and `active`; `updated_at` is bumped.
    pub fn upsert(&self, address: &CanonicalAddress, role: &Role) -> AllowlistDbResult<UpsertOutcome> {
        let write_txn = self.db.begin_write()?;
        let outcome = {
            let mut table = write_txn.open_table(ALLOWLIST)?;

            // Read existing value and deserialize before mutating
            let existing_bytes = table
                .get(address.as_str())?
                .map(|existing| existing.value().to_vec());

            let (record, outcome) = match existing_bytes {
                Some(bytes) => {
                    let mut record: AllowlistRecord = serde_json::from_slice(&bytes)?;
                    record.role = role.clone();
                    record.updated_at = Utc::now();
                    (record, UpsertOutcome::Updated)
                }
                None => (
                    AllowlistRecord::new(address.clone(), role.clone()),
                    UpsertOutcome::Inserted,
                ),
            };

            let json = serde_json::to_vec(&record)?;
            table.insert(address.as_str(), json.as_slice())?;
            outcome
        };
        write_txn.commit()?;
        Ok(outcome)
    }

    /// Delete the record for an address. Returns whether one existed.
    pub fn remove(&self, address: &CanonicalAddress) -> AllowlistDbResult<bool> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(ALLOWLIST)?;
            let removed = table.remove(address.as_str())?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Count records, in total and per role.
    pub fn stats(&self) -> AllowlistDbResult<AllowlistStats> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ALLOWLIST)?;

        let mut stats = AllowlistStats::default();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let record: AllowlistRecord = serde_json::from_slice(value.value())?;
            stats.record(&record.role);
        }
        Ok(stats)
    }

    /// Open a read transaction on the table without reading any record.
    pub fn ping(&self) -> AllowlistDbResult<()> {
        let read_txn = self.db.begin_read()?;
        read_txn.open_table(ALLOWLIST)?;
        Ok(())
    }

    /// Delete every record. Returns how many were removed.
    pub fn clear(&self) -> AllowlistDbResult<usize> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(ALLOWLIST)?;
            let keys = table
                .iter()?
                .map(|entry| entry.map(|(key, _)| key.value().to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            for key in &keys {
                table.remove(key.as_str())?;
            }
            keys.len()
        };
        write_txn.commit()?;
        Ok(removed)
    }
}

#[async_trait]
impl RecordStore for AllowlistDatabase {
    async fn find_by_key(&self, key: &CanonicalAddress) -> Result<Option<AllowlistRecord>, StoreError> {
        Ok(self.get(key)?)
    }
}

#[async_trait]
impl AllowlistStore for AllowlistDatabase {
    async fn stats(&self) -> Result<AllowlistStats, StoreError> {
        Ok(AllowlistDatabase::stats(self)?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(AllowlistDatabase::ping(self)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
