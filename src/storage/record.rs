// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persisted allowlist entities.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::address::CanonicalAddress;
use crate::roles::Role;

fn default_active() -> bool {
    true
}

/// One allowlisted wallet.
///
/// Keyed by canonical address; at most one record exists per address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AllowlistRecord {
    /// Canonical (lowercase) wallet address.
    pub wallet_address: CanonicalAddress,
    /// Role held by this wallet.
    #[serde(rename = "roles")]
    pub role: Role,
    /// Administrative flag; lookups do not consult it.
    #[serde(default = "default_active")]
    pub active: bool,
    /// When the record was first written.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl AllowlistRecord {
    /// A fresh, active record stamped with the current time.
    pub fn new(wallet_address: CanonicalAddress, role: Role) -> Self {
        let now = Utc::now();
        Self {
            wallet_address,
            role,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Whether an upsert created a record or replaced an existing one's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Aggregate allowlist counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AllowlistStats {
    /// Total number of allowlisted wallets.
    pub total: usize,
    /// Number of wallets per role.
    #[serde(rename = "byRole")]
    pub by_role: BTreeMap<String, usize>,
}

impl AllowlistStats {
    /// Tally a sequence of records.
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a AllowlistRecord>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.record(&record.role);
        }
        stats
    }

    pub(crate) fn record(&mut self, role: &Role) {
        self.total += 1;
        *self.by_role.entry(role.as_str().to_string()).or_default() += 1;
    }
}
