// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tracing subscriber setup shared by the server and the admin CLI.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, DEFAULT_LOG_FILTER};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter '{value}': {source}")]
    Filter {
        value: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init(format: LogFormat, default_filter: &str) -> Result<(), LoggingError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(|source| LoggingError::Filter {
            value: default_filter.to_string(),
            source,
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    match format {
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
        LogFormat::Pretty => builder.with_target(false).compact().try_init(),
    }
    .map_err(LoggingError::Subscriber)
}

/// [`init`] with the service's default filter.
pub fn init_default(format: LogFormat) -> Result<(), LoggingError> {
    init(format, DEFAULT_LOG_FILTER)
}
