// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Administrative writes to the allowlist database.
//!
//! Single-record operations fail loudly. Batch operations (usually fed from
//! a newline-delimited address file) validate every line on its own: invalid
//! lines, duplicates, missing records and per-item store failures are logged
//! and counted in a [`BatchReport`], and the batch carries on.
//!
//! Roles are checked against the configured [`RoleTable`] before anything is
//! written, so a typo in a role name never reaches the database.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::address::CanonicalAddress;
use crate::roles::{Role, RoleTable};
use crate::storage::{AllowlistDatabase, AllowlistDbError, AllowlistStats, UpsertOutcome};

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("invalid address format: {0}")]
    InvalidAddress(String),

    #[error("invalid role '{role}'; must be one of: {allowed}")]
    UnknownRole { role: String, allowed: String },

    #[error("wallet address already exists: {0}")]
    Duplicate(CanonicalAddress),

    #[error("wallet not found: {0}")]
    NotFound(CanonicalAddress),

    #[error("failed to read address file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Database(AllowlistDbError),
}

impl From<AllowlistDbError> for AdminError {
    fn from(err: AllowlistDbError) -> Self {
        match err {
            AllowlistDbError::AlreadyExists(address) => AdminError::Duplicate(address),
            other => AdminError::Database(other),
        }
    }
}

/// Per-batch counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Lines looked at (blank lines excluded).
    pub processed: usize,
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
    pub duplicates: usize,
    pub not_found: usize,
    pub skipped_invalid: usize,
    pub failed: usize,
}

impl BatchReport {
    /// Items that changed the database.
    pub fn succeeded(&self) -> usize {
        self.added + self.updated + self.deleted
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed: {}, added: {}, updated: {}, deleted: {}, duplicates: {}, not found: {}, skipped invalid: {}, failed: {}",
            self.processed,
            self.added,
            self.updated,
            self.deleted,
            self.duplicates,
            self.not_found,
            self.skipped_invalid,
            self.failed
        )
    }
}

/// Split file contents into trimmed, non-empty address lines.
pub fn parse_address_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a newline-delimited address file.
pub fn read_address_file(path: &Path) -> Result<Vec<String>, AdminError> {
    let text = std::fs::read_to_string(path).map_err(|source| AdminError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_address_lines(&text))
}

/// Allowlist write operations over a database and role vocabulary.
pub struct AllowlistAdmin<'a> {
    db: &'a AllowlistDatabase,
    roles: &'a RoleTable,
}

impl<'a> AllowlistAdmin<'a> {
    pub fn new(db: &'a AllowlistDatabase, roles: &'a RoleTable) -> Self {
        Self { db, roles }
    }

    fn check_role(&self, role: &str) -> Result<Role, AdminError> {
        if self.roles.contains(role) {
            Ok(Role::from(role))
        } else {
            Err(AdminError::UnknownRole {
                role: role.to_string(),
                allowed: self.roles.names().collect::<Vec<_>>().join(", "),
            })
        }
    }

    fn parse_address(raw: &str) -> Result<CanonicalAddress, AdminError> {
        CanonicalAddress::parse(raw).map_err(|_| AdminError::InvalidAddress(raw.to_string()))
    }

    /// Add one wallet. An existing record is an error.
    pub fn add(&self, address: &str, role: &str) -> Result<CanonicalAddress, AdminError> {
        let role = self.check_role(role)?;
        let key = Self::parse_address(address)?;
        self.db.insert(&key, &role)?;
        tracing::info!(address = %key, %role, "added wallet");
        Ok(key)
    }

    /// Set one wallet's role, adding it if absent.
    pub fn replace(
        &self,
        address: &str,
        role: &str,
    ) -> Result<(CanonicalAddress, UpsertOutcome), AdminError> {
        let role = self.check_role(role)?;
        let key = Self::parse_address(address)?;
        let outcome = self.db.upsert(&key, &role)?;
        match outcome {
            UpsertOutcome::Inserted => tracing::info!(address = %key, %role, "added wallet"),
            UpsertOutcome::Updated => tracing::info!(address = %key, %role, "updated wallet role"),
        }
        Ok((key, outcome))
    }

    /// Remove one wallet. A missing record is an error.
    pub fn delete(&self, address: &str) -> Result<(), AdminError> {
        let key = Self::parse_address(address)?;
        if self.db.remove(&key)? {
            tracing::info!(address = %key, "deleted wallet");
            Ok(())
        } else {
            Err(AdminError::NotFound(key))
        }
    }

    /// Add many wallets with one role, skipping duplicates.
    pub fn add_batch<I, A>(&self, addresses: I, role: &str) -> Result<BatchReport, AdminError>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let role = self.check_role(role)?;
        let mut report = BatchReport::default();

        for raw in addresses {
            let raw = raw.as_ref();
            let Some(key) = self.batch_key(raw, &mut report) else {
                continue;
            };
            match self.db.insert(&key, &role) {
                Ok(()) => {
                    tracing::info!(address = %key, %role, "added wallet");
                    report.added += 1;
                }
                Err(AllowlistDbError::AlreadyExists(_)) => {
                    tracing::warn!(address = %key, "skipping duplicate wallet address");
                    report.duplicates += 1;
                }
                Err(err) => {
                    tracing::error!(address = %key, error = %err, "failed to add wallet");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(%report, "finished adding wallets");
        Ok(report)
    }

    /// Set the role of many wallets, adding missing ones.
    pub fn replace_batch<I, A>(&self, addresses: I, role: &str) -> Result<BatchReport, AdminError>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let role = self.check_role(role)?;
        let mut report = BatchReport::default();

        for raw in addresses {
            let raw = raw.as_ref();
            let Some(key) = self.batch_key(raw, &mut report) else {
                continue;
            };
            match self.db.upsert(&key, &role) {
                Ok(UpsertOutcome::Inserted) => {
                    tracing::info!(address = %key, %role, "added wallet");
                    report.added += 1;
                }
                Ok(UpsertOutcome::Updated) => {
                    tracing::info!(address = %key, %role, "updated wallet role");
                    report.updated += 1;
                }
                Err(err) => {
                    tracing::error!(address = %key, error = %err, "failed to upsert wallet");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(%report, "finished replacing wallet roles");
        Ok(report)
    }

    /// Remove many wallets, counting the ones that were not present.
    pub fn delete_batch<I, A>(&self, addresses: I) -> BatchReport
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let mut report = BatchReport::default();

        for raw in addresses {
            let raw = raw.as_ref();
            let Some(key) = self.batch_key(raw, &mut report) else {
                continue;
            };
            match self.db.remove(&key) {
                Ok(true) => {
                    tracing::info!(address = %key, "deleted wallet");
                    report.deleted += 1;
                }
                Ok(false) => {
                    tracing::warn!(address = %key, "wallet not found (nothing deleted)");
                    report.not_found += 1;
                }
                Err(err) => {
                    tracing::error!(address = %key, error = %err, "failed to delete wallet");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(%report, "finished deleting wallets");
        report
    }

    /// Count and validate one batch line. `None` means skip it.
    fn batch_key(&self, raw: &str, report: &mut BatchReport) -> Option<CanonicalAddress> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        report.processed += 1;

        match CanonicalAddress::parse(raw) {
            Ok(key) => Some(key),
            Err(_) => {
                tracing::warn!(address = raw, "skipping invalid address format");
                report.skipped_invalid += 1;
                None
            }
        }
    }

    pub fn stats(&self) -> Result<AllowlistStats, AdminError> {
        Ok(self.db.stats()?)
    }

    /// Delete every record.
    pub fn clear(&self) -> Result<usize, AdminError> {
        let removed = self.db.clear()?;
        tracing::warn!(removed, "cleared allowlist");
        Ok(removed)
    }
}
