// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use axum::http::HeaderValue;

use crate::config::DEFAULT_ENVIRONMENT;
use crate::eligibility::EligibilityResolver;
use crate::roles::RoleTable;
use crate::storage::{AllowlistStore, InMemoryStore};

/// Shared handler state. Cloned per request; everything inside is `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AllowlistStore>,
    pub resolver: EligibilityResolver,
    pub environment: Arc<str>,
    pub cors_origin: Option<HeaderValue>,
}

impl AppState {
    pub fn new(store: Arc<dyn AllowlistStore>, roles: RoleTable) -> Self {
        Self {
            store,
            resolver: EligibilityResolver::new(Arc::new(roles)),
            environment: Arc::from(DEFAULT_ENVIRONMENT),
            cors_origin: None,
        }
    }

    pub fn with_environment(mut self, environment: impl AsRef<str>) -> Self {
        self.environment = Arc::from(environment.as_ref());
        self
    }

    pub fn with_cors_origin(mut self, origin: Option<HeaderValue>) -> Self {
        self.cors_origin = origin;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), RoleTable::default())
    }
}
