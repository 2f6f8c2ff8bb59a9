// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Allowlist roles and their display messages.
//!
//! Role names are deployment data, not code: each deployment ships its own
//! vocabulary (`whitelist`/`fcfs`/`guaranteed` for a presale,
//! `Crown`/`Loyal_Crown`/`Graduated_Crown` for a mint, ...). A [`RoleTable`]
//! maps those names to the label and message shown to end users.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "whitelist": "You have whitelist access!",
//!   "guaranteed": { "label": "Guaranteed", "message": "You are guaranteed a spot." }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message returned for a stored role the table does not know about.
pub const FALLBACK_ROLE_MESSAGE: &str = "Access granted";

/// An allowlist role tag as stored on a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "whitelist")]
pub struct Role(String);

impl Role {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Display data for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDisplay {
    /// Short human-readable name; defaults to the role tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Message shown when an address holding this role is checked.
    pub message: String,
}

/// Either a bare message or the full display object.
#[derive(Deserialize)]
#[serde(untagged)]
enum RoleEntry {
    Message(String),
    Display(RoleDisplay),
}

impl From<RoleEntry> for RoleDisplay {
    fn from(entry: RoleEntry) -> Self {
        match entry {
            RoleEntry::Message(message) => RoleDisplay {
                label: None,
                message,
            },
            RoleEntry::Display(display) => display,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RoleTableError {
    #[error("failed to read role table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid role table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("role table is empty")]
    Empty,

    #[error("role table contains an empty role name")]
    EmptyRoleName,

    #[error("role '{0}' has an empty message")]
    EmptyMessage(String),
}

/// Configured role vocabulary: role tag → display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    roles: BTreeMap<String, RoleDisplay>,
}

impl RoleTable {
    /// An empty table. Every role resolves to the fallback message.
    pub fn empty() -> Self {
        Self {
            roles: BTreeMap::new(),
        }
    }

    /// Add or replace one role.
    pub fn with_role(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.roles.insert(
            name.into(),
            RoleDisplay {
                label: None,
                message: message.into(),
            },
        );
        self
    }

    /// Add or replace one role with a display label.
    pub fn with_labeled_role(
        mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.roles.insert(
            name.into(),
            RoleDisplay {
                label: Some(label.into()),
                message: message.into(),
            },
        );
        self
    }

    /// The presale vocabulary the service ships with.
    ///
    /// Mirrors `config/roles/presale.json`.
    pub fn presale() -> Self {
        Self::empty()
            .with_labeled_role(
                "whitelist",
                "Whitelist",
                "You have whitelist access! You can participate in the whitelist round.",
            )
            .with_labeled_role(
                "fcfs",
                "FCFS",
                "You have FCFS (First Come First Serve) access! You can participate after the whitelist round.",
            )
            .with_labeled_role(
                "guaranteed",
                "Guaranteed",
                "You have guaranteed allocation access! You are guaranteed a spot in the sale.",
            )
    }

    /// Parse a JSON role table.
    pub fn from_json_str(json: &str) -> Result<Self, RoleTableError> {
        let raw: BTreeMap<String, RoleEntry> = serde_json::from_str(json)?;
        if raw.is_empty() {
            return Err(RoleTableError::Empty);
        }

        let mut roles = BTreeMap::new();
        for (name, entry) in raw {
            if name.trim().is_empty() {
                return Err(RoleTableError::EmptyRoleName);
            }
            let display = RoleDisplay::from(entry);
            if display.message.trim().is_empty() {
                return Err(RoleTableError::EmptyMessage(name));
            }
            roles.insert(name, display);
        }

        Ok(Self { roles })
    }

    /// Load a JSON role table from disk.
    pub fn load(path: &Path) -> Result<Self, RoleTableError> {
        let json = std::fs::read_to_string(path).map_err(|source| RoleTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Message for a role, or [`FALLBACK_ROLE_MESSAGE`] if the role is unknown.
    pub fn message_for(&self, role: &str) -> &str {
        self.roles
            .get(role)
            .map(|display| display.message.as_str())
            .unwrap_or(FALLBACK_ROLE_MESSAGE)
    }

    /// Display label for a known role.
    pub fn label_for<'a>(&'a self, role: &'a str) -> Option<&'a str> {
        self.roles
            .get(role)
            .map(|display| display.label.as_deref().unwrap_or(role))
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Configured role names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::presale()
    }
}
