// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use allowlist_checker::{config::ServerConfig, logging, server};

#[tokio::main]
async fn main() {
    // A missing .env file is normal in production.
    let _ = dotenvy::dotenv();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = logging::init_default(config.log_format) {
        eprintln!("logging setup failed: {err}");
        std::process::exit(1);
    }

    if let Err(err) = server::run(config).await {
        tracing::error!(error = %err, "wallet checker failed");
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
