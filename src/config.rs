// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`ServerConfig`] loaded from them at startup. A `.env` file in the working
//! directory is honoured (loaded by the binaries before reading the
//! environment).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3001` |
//! | `ALLOWLIST_DB_PATH` | redb allowlist database file (`:memory:` for an empty in-memory store) | `data/allowlist.redb` |
//! | `ROLE_TABLE_PATH` | JSON role → message table | built-in presale table |
//! | `CORS_ALLOWED_ORIGIN` | Single allowed browser origin | any origin |
//! | `APP_ENV` | Environment name reported by `/api/health` | `development` |
//! | `LOOKUP_CACHE_CAPACITY` | Max cached addresses | `1024` |
//! | `LOOKUP_CACHE_TTL_SECS` | Cache entry lifetime, `0` disables the cache | `0` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM certificate chain and key; enables HTTPS | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the allowlist database file.
///
/// The special value [`IN_MEMORY_DB`] starts the service with an empty
/// in-memory store instead.
pub const DB_PATH_ENV: &str = "ALLOWLIST_DB_PATH";
pub const ROLE_TABLE_PATH_ENV: &str = "ROLE_TABLE_PATH";
pub const CORS_ORIGIN_ENV: &str = "CORS_ALLOWED_ORIGIN";
pub const APP_ENV_ENV: &str = "APP_ENV";
pub const CACHE_CAPACITY_ENV: &str = "LOOKUP_CACHE_CAPACITY";
pub const CACHE_TTL_ENV: &str = "LOOKUP_CACHE_TTL_SECS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DB_PATH: &str = "data/allowlist.redb";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Sentinel database path selecting the in-memory store.
pub const IN_MEMORY_DB: &str = ":memory:";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{present} is set but {missing} is not; HTTPS needs both")]
    IncompleteTls {
        present: &'static str,
        missing: &'static str,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "" => Ok(Self::Pretty),
            other => Err(ConfigError::invalid(LOG_FORMAT_ENV, other, "expected 'json' or 'pretty'")),
        }
    }

    /// Read `LOG_FORMAT`, falling back to pretty output on bad values.
    pub fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .ok()
            .and_then(|value| Self::parse(&value).ok())
            .unwrap_or_default()
    }
}

/// Where allowlist records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Database(PathBuf),
    InMemory,
}

/// PEM files for the HTTPS listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Read-through cache settings. `ttl == 0` means disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    pub capacity: usize,
    pub ttl: Duration,
}

impl CacheSettings {
    pub fn enabled(&self) -> bool {
        !self.ttl.is_zero()
    }
}

/// Everything the HTTP service needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub role_table_path: Option<PathBuf>,
    pub cors_origin: Option<HeaderValue>,
    pub environment: String,
    pub cache: CacheSettings,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var(PORT_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|err| ConfigError::invalid(PORT_ENV, &raw, err))?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .map_err(|err| ConfigError::invalid(HOST_ENV, &host, err))?;

        let store = match var(DB_PATH_ENV) {
            Some(path) if path.trim() == IN_MEMORY_DB => StoreBackend::InMemory,
            Some(path) => StoreBackend::Database(PathBuf::from(path)),
            None => StoreBackend::Database(PathBuf::from(DEFAULT_DB_PATH)),
        };

        let cors_origin = var(CORS_ORIGIN_ENV)
            .map(|origin| {
                HeaderValue::from_str(origin.trim())
                    .map_err(|err| ConfigError::invalid(CORS_ORIGIN_ENV, &origin, err))
            })
            .transpose()?;

        let capacity = match var(CACHE_CAPACITY_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|err| ConfigError::invalid(CACHE_CAPACITY_ENV, &raw, err))?,
            None => DEFAULT_CACHE_CAPACITY,
        };
        let ttl_secs = match var(CACHE_TTL_ENV) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|err| ConfigError::invalid(CACHE_TTL_ENV, &raw, err))?,
            None => 0,
        };

        let tls = match (var(TLS_CERT_PATH_ENV), var(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: PathBuf::from(cert),
                key: PathBuf::from(key),
            }),
            (Some(_), None) => {
                return Err(ConfigError::IncompleteTls {
                    present: TLS_CERT_PATH_ENV,
                    missing: TLS_KEY_PATH_ENV,
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteTls {
                    present: TLS_KEY_PATH_ENV,
                    missing: TLS_CERT_PATH_ENV,
                })
            }
            (None, None) => None,
        };

        let log_format = match var(LOG_FORMAT_ENV) {
            Some(raw) => LogFormat::parse(&raw)?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            store,
            role_table_path: var(ROLE_TABLE_PATH_ENV).map(PathBuf::from),
            cors_origin,
            environment: var(APP_ENV_ENV).unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            cache: CacheSettings {
                capacity,
                ttl: Duration::from_secs(ttl_secs),
            },
            tls,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3001".parse().unwrap());
        assert_eq!(config.store, StoreBackend::Database(PathBuf::from(DEFAULT_DB_PATH)));
        assert!(config.role_table_path.is_none());
        assert!(config.cors_origin.is_none());
        assert_eq!(config.environment, "development");
        assert!(!config.cache.enabled());
        assert!(config.tls.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn reads_all_variables() {
        let config = load(&[
            (HOST_ENV, "127.0.0.1"),
            (PORT_ENV, "8080"),
            (DB_PATH_ENV, "/var/lib/allowlist.redb"),
            (ROLE_TABLE_PATH_ENV, "config/roles/crown.json"),
            (CORS_ORIGIN_ENV, "https://wallet-checker.example"),
            (APP_ENV_ENV, "production"),
            (CACHE_CAPACITY_ENV, "64"),
            (CACHE_TTL_ENV, "30"),
            (TLS_CERT_PATH_ENV, "cert.pem"),
            (TLS_KEY_PATH_ENV, "key.pem"),
            (LOG_FORMAT_ENV, "JSON"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(
            config.store,
            StoreBackend::Database(PathBuf::from("/var/lib/allowlist.redb"))
        );
        assert_eq!(
            config.role_table_path,
            Some(PathBuf::from("config/roles/crown.json"))
        );
        assert_eq!(
            config.cors_origin,
            Some(HeaderValue::from_static("https://wallet-checker.example"))
        );
        assert_eq!(config.environment, "production");
        assert_eq!(config.cache.capacity, 64);
        assert_eq!(config.cache.ttl, Duration::from_secs(30));
        assert!(config.cache.enabled());
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert: PathBuf::from("cert.pem"),
                key: PathBuf::from("key.pem"),
            })
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn in_memory_sentinel_selects_memory_store() {
        let config = load(&[(DB_PATH_ENV, ":memory:")]).unwrap();
        assert_eq!(config.store, StoreBackend::InMemory);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[(PORT_ENV, "http")]),
            Err(ConfigError::Invalid { var: PORT_ENV, .. })
        ));
        assert!(matches!(
            load(&[(CACHE_TTL_ENV, "-1")]),
            Err(ConfigError::Invalid { var: CACHE_TTL_ENV, .. })
        ));
        assert!(matches!(
            load(&[(LOG_FORMAT_ENV, "xml")]),
            Err(ConfigError::Invalid { var: LOG_FORMAT_ENV, .. })
        ));
        assert!(matches!(
            load(&[(HOST_ENV, "not a host")]),
            Err(ConfigError::Invalid { var: HOST_ENV, .. })
        ));
    }

    #[test]
    fn tls_requires_both_files() {
        assert!(matches!(
            load(&[(TLS_CERT_PATH_ENV, "cert.pem")]),
            Err(ConfigError::IncompleteTls { missing: TLS_KEY_PATH_ENV, .. })
        ));
        assert!(matches!(
            load(&[(TLS_KEY_PATH_ENV, "key.pem")]),
            Err(ConfigError::IncompleteTls { missing: TLS_CERT_PATH_ENV, .. })
        ));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[(PORT_ENV, "  "), (APP_ENV_ENV, "")]).unwrap();
        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.environment, DEFAULT_ENVIRONMENT);
    }
}
