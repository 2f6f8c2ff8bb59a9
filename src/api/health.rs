// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::HealthResponse;
use crate::state::AppState;

/// Readiness response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Individual checks and their results.
    pub checks: ReadyChecks,
}

/// Individual readiness check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Whether the allowlist store answers queries.
    pub store: String,
}

/// Liveness handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Wallet checker API is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        environment: state.environment.to_string(),
    })
}

/// Readiness handler.
///
/// Returns 200 only if the allowlist store can be queried.
#[utoipa::path(
    get,
    path = "/api/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Store unavailable", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let store_ok = match state.store.ping().await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "readiness check: allowlist store unavailable");
            false
        }
    };

    let response = ReadyResponse {
        status: if store_ok { "ok" } else { "degraded" }.to_string(),
        checks: ReadyChecks {
            service: "ok".to_string(),
            store: if store_ok { "ok" } else { "unavailable" }.to_string(),
        },
    };

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
