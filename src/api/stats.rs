// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    error::{ApiError, ErrorBody},
    models::StatsResponse,
    state::AppState,
};

/// Allowlist size, in total and per role.
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Stats",
    responses(
        (status = 200, description = "Allowlist statistics", body = StatsResponse),
        (status = 500, description = "Allowlist store unavailable", body = ErrorBody)
    )
)]
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let data = state.store.stats().await.map_err(|err| {
        tracing::error!(error = %err, "failed to compute allowlist stats");
        ApiError::internal()
    })?;

    Ok(Json(StatsResponse {
        success: true,
        data,
    }))
}
