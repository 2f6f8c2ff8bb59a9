// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Service startup: build the store and role table from configuration, then
//! serve the API over HTTP or HTTPS.

use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;

use crate::api::router;
use crate::config::{ServerConfig, StoreBackend, TlsPaths};
use crate::roles::{RoleTable, RoleTableError};
use crate::state::AppState;
use crate::storage::{AllowlistDatabase, AllowlistDbError, AllowlistStore, CachedRecordStore, InMemoryStore};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to load role table: {0}")]
    Roles(#[from] RoleTableError),

    #[error("failed to open allowlist database: {0}")]
    Database(#[from] AllowlistDbError),

    #[error("failed to load TLS credentials: {0}")]
    Tls(#[source] std::io::Error),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Load the configured role vocabulary, or the built-in one.
pub fn load_role_table(config: &ServerConfig) -> Result<RoleTable, RoleTableError> {
    match &config.role_table_path {
        Some(path) => {
            let table = RoleTable::load(path)?;
            tracing::info!(path = %path.display(), roles = table.len(), "loaded role table");
            Ok(table)
        }
        None => {
            tracing::info!("using built-in presale role table");
            Ok(RoleTable::default())
        }
    }
}

/// Open the configured store, wrapped in the lookup cache when enabled.
pub fn open_store(config: &ServerConfig) -> Result<Arc<dyn AllowlistStore>, AllowlistDbError> {
    let cache = config.cache;

    match &config.store {
        StoreBackend::Database(path) => {
            let db = AllowlistDatabase::open(path)?;
            tracing::info!(path = %path.display(), "opened allowlist database");
            if cache.enabled() {
                tracing::info!(capacity = cache.capacity, ttl_secs = cache.ttl.as_secs(), "lookup cache enabled");
                Ok(Arc::new(CachedRecordStore::new(db, cache.capacity, cache.ttl)))
            } else {
                Ok(Arc::new(db))
            }
        }
        StoreBackend::InMemory => {
            tracing::warn!("using empty in-memory allowlist store");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

/// Build the application state from configuration.
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let roles = load_role_table(config)?;
    let store = open_store(config)?;

    Ok(AppState::new(store, roles)
        .with_environment(&config.environment)
        .with_cors_origin(config.cors_origin.clone()))
}

/// Run the service until shutdown.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = build_state(&config)?;
    let app = router(state);
    let addr = config.bind_addr;

    match &config.tls {
        Some(tls) => {
            let tls_config = load_tls(tls).await?;
            tracing::info!(%addr, "wallet checker listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = TcpListener::bind(addr).await?;
            tracing::info!(%addr, "wallet checker listening on http://{addr} (docs at /docs)");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    tracing::info!("server stopped");
    Ok(())
}

async fn load_tls(tls: &TlsPaths) -> Result<RustlsConfig, ServerError> {
    // The ring provider must be installed before any TLS config is built.
    // A second install attempt fails harmlessly.
    let _ = rustls::crypto::ring::default_provider().install_default();

    RustlsConfig::from_pem_file(&tls.cert, &tls.key)
        .await
        .map_err(ServerError::Tls)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::address::CanonicalAddress;
    use crate::config::{DB_PATH_ENV, ROLE_TABLE_PATH_ENV, CACHE_TTL_ENV};

    fn config(vars: &[(&str, String)]) -> ServerConfig {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned()).unwrap()
    }

    #[tokio::test]
    async fn builds_state_from_database_and_role_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("allowlist.redb");
        let roles_path = dir.path().join("roles.json");
        std::fs::write(&roles_path, r#"{ "Crown": "FCFS mint phase" }"#).unwrap();

        let key = CanonicalAddress::parse("0x1111111111111111111111111111111111111111").unwrap();
        {
            let db = AllowlistDatabase::open(&db_path).unwrap();
            db.insert(&key, &"Crown".into()).unwrap();
        }

        let state = build_state(&config(&[
            (DB_PATH_ENV, db_path.display().to_string()),
            (ROLE_TABLE_PATH_ENV, roles_path.display().to_string()),
            (CACHE_TTL_ENV, "60".to_string()),
        ]))
        .unwrap();

        let outcome = state.resolver.resolve(&key, state.store.as_ref()).await;
        assert_eq!(
            outcome,
            crate::eligibility::EligibilityOutcome::Eligible {
                role: "Crown".into(),
                label: Some("Crown".into()),
                message: "FCFS mint phase".into(),
            }
        );
    }

    #[test]
    fn missing_role_file_is_startup_error() {
        let result = build_state(&config(&[
            (DB_PATH_ENV, ":memory:".to_string()),
            (ROLE_TABLE_PATH_ENV, "/nonexistent/roles.json".to_string()),
        ]));
        assert!(matches!(result, Err(ServerError::Roles(_))));
    }
}
