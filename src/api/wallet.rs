// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    error::{ApiError, ErrorBody},
    models::{CheckWalletRequest, CheckWalletResponse, EligibilityData},
    state::AppState,
};

/// Returned when the body is not a JSON object.
pub const INVALID_BODY_MESSAGE: &str = "invalid request body";

/// Check whether a wallet is on the allowlist.
///
/// Input problems are answered with 400 before the store is queried; a store
/// failure is answered with a generic 500.
#[utoipa::path(
    post,
    path = "/api/wallet/check",
    request_body = CheckWalletRequest,
    tag = "Wallet",
    responses(
        (status = 200, description = "Eligibility answer", body = CheckWalletResponse),
        (status = 400, description = "Missing or malformed address", body = ErrorBody),
        (status = 500, description = "Allowlist store unavailable", body = ErrorBody)
    )
)]
pub async fn check_wallet(
    State(state): State<AppState>,
    payload: Result<Json<CheckWalletRequest>, JsonRejection>,
) -> Result<Json<CheckWalletResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejected wallet check body");
        ApiError::bad_request(INVALID_BODY_MESSAGE)
    })?;

    let outcome = state
        .resolver
        .check(request.address.as_ref(), state.store.as_ref())
        .await?;

    let data = EligibilityData::from_outcome(outcome).ok_or_else(ApiError::internal)?;
    Ok(Json(CheckWalletResponse::new(data)))
}
