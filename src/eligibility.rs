// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Eligibility Resolution
//!
//! Turns a canonical wallet address into an answer for the caller:
//!
//! ```text
//! raw input ──validate──▶ CanonicalAddress ──find_by_key──▶ record / none / error
//!                                                             │
//!                         Eligible{role,message} ◀────────────┤
//!                         NotEligible{message}   ◀────────────┤
//!                         LookupFailed           ◀────────────┘
//! ```
//!
//! Each call is independent: one store read, no retries, no shared state.
//! Timeouts and cancellation are whatever the caller's task imposes.

use std::sync::Arc;

use serde_json::Value;

use crate::address::{self, AddressError, CanonicalAddress};
use crate::roles::{Role, RoleTable};
use crate::storage::RecordStore;

/// Message returned when an address has no allowlist record.
pub const NOT_FOUND_MESSAGE: &str = "address not found in allowlist";

/// Result of one eligibility lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityOutcome {
    /// The address is allowlisted. `label` is absent for roles the table
    /// does not know.
    Eligible {
        role: Role,
        label: Option<String>,
        message: String,
    },
    /// No record exists for the address.
    NotEligible { message: String },
    /// The store could not be read.
    LookupFailed,
}

impl EligibilityOutcome {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible { .. })
    }
}

/// Classifies store lookups using the configured role vocabulary.
#[derive(Debug, Clone)]
pub struct EligibilityResolver {
    roles: Arc<RoleTable>,
}

impl EligibilityResolver {
    pub fn new(roles: Arc<RoleTable>) -> Self {
        Self { roles }
    }

    /// Display message for a role, falling back to "Access granted".
    pub fn role_message(&self, role: &Role) -> &str {
        self.roles.message_for(role.as_str())
    }

    /// Display label for a configured role.
    pub fn role_label<'a>(&'a self, role: &'a Role) -> Option<&'a str> {
        self.roles.label_for(role.as_str())
    }

    /// Look up one canonical address and classify the result.
    pub async fn resolve<S>(&self, key: &CanonicalAddress, store: &S) -> EligibilityOutcome
    where
        S: RecordStore + ?Sized,
    {
        match store.find_by_key(key).await {
            Ok(Some(record)) => {
                let message = self.role_message(&record.role).to_string();
                let label = self.role_label(&record.role).map(str::to_string);
                tracing::debug!(address = %key, role = %record.role, "address is allowlisted");
                EligibilityOutcome::Eligible {
                    role: record.role,
                    label,
                    message,
                }
            }
            Ok(None) => {
                tracing::debug!(address = %key, "address not in allowlist");
                EligibilityOutcome::NotEligible {
                    message: NOT_FOUND_MESSAGE.to_string(),
                }
            }
            Err(err) => {
                tracing::error!(address = %key, error = %err, "allowlist lookup failed");
                EligibilityOutcome::LookupFailed
            }
        }
    }

    /// Full lookup contract for a raw request value.
    ///
    /// Input errors are returned before the store is touched.
    pub async fn check<S>(
        &self,
        raw: Option<&Value>,
        store: &S,
    ) -> Result<EligibilityOutcome, AddressError>
    where
        S: RecordStore + ?Sized,
    {
        let key = address::validate_input(raw)?;
        Ok(self.resolve(&key, store).await)
    }
}

impl Default for EligibilityResolver {
    fn default() -> Self {
        Self::new(Arc::new(RoleTable::default()))
    }
}
