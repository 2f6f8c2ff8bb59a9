// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Allowlist Checker - Wallet Allowlist Lookup Service
//!
//! Answers "is this wallet allowlisted, and with which role?" for a
//! self-check web form, and ships the tooling that loads the allowlist.
//!
//! ## Modules
//!
//! - `address` - Address validation and canonical lookup keys
//! - `roles` - Configurable role vocabulary and messages
//! - `eligibility` - Lookup classification (eligible / not eligible / failed)
//! - `storage` - Record store trait, redb database, cache
//! - `admin` - Bulk add / replace / delete of allowlist records
//! - `api` - HTTP API handlers (Axum)

pub mod address;
pub mod admin;
pub mod api;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod logging;
pub mod models;
pub mod roles;
pub mod server;
pub mod state;
pub mod storage;
