// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Every response uses the same
//! envelope: `success` plus either `data` or (for errors, see
//! [`crate::error::ApiError`]) `error`.
//!
//! ## Model Categories
//!
//! - **Wallet check**: the lookup request and its eligibility answer
//! - **Stats**: allowlist counts per role
//! - **Health**: liveness information

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::eligibility::EligibilityOutcome;
use crate::roles::Role;
use crate::storage::AllowlistStats;

// =============================================================================
// Wallet Check Models
// =============================================================================

/// Request to check a wallet against the allowlist.
///
/// `address` is kept as raw JSON so absent, `null` and non-string values can
/// be told apart from malformed strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CheckWalletRequest {
    /// Wallet address, e.g. `0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12`.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12")]
    pub address: Option<Value>,
}

/// Eligibility answer for one wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EligibilityData {
    /// Whether the wallet has an allowlist record.
    pub whitelisted: bool,
    /// Role held by the wallet (only when whitelisted).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Role>,
    /// Display label of the role, when the role table knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Human-readable explanation.
    pub message: String,
}

impl EligibilityData {
    /// Map a resolved outcome to response data. `LookupFailed` has no data.
    pub fn from_outcome(outcome: EligibilityOutcome) -> Option<Self> {
        match outcome {
            EligibilityOutcome::Eligible {
                role,
                label,
                message,
            } => Some(Self {
                whitelisted: true,
                roles: Some(role),
                label,
                message,
            }),
            EligibilityOutcome::NotEligible { message } => Some(Self {
                whitelisted: false,
                roles: None,
                label: None,
                message,
            }),
            EligibilityOutcome::LookupFailed => None,
        }
    }
}

/// Successful wallet check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckWalletResponse {
    /// Always `true`.
    pub success: bool,
    pub data: EligibilityData,
}

impl CheckWalletResponse {
    pub fn new(data: EligibilityData) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// =============================================================================
// Stats Models
// =============================================================================

/// Allowlist statistics response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    /// Always `true`.
    pub success: bool,
    pub data: AllowlistStats,
}

// =============================================================================
// Health Models
// =============================================================================

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    /// Current server time (RFC 3339).
    pub timestamp: String,
    /// Deployment environment name.
    pub environment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eligible_outcome_serializes_with_role() {
        let data = EligibilityData::from_outcome(EligibilityOutcome::Eligible {
            role: Role::from("whitelist"),
            label: Some("Whitelist".into()),
            message: "welcome".into(),
        })
        .unwrap();

        let body = serde_json::to_value(CheckWalletResponse::new(data)).unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": {
                    "whitelisted": true,
                    "roles": "whitelist",
                    "label": "Whitelist",
                    "message": "welcome"
                }
            })
        );
    }

    #[test]
    fn unknown_role_omits_label() {
        let data = EligibilityData::from_outcome(EligibilityOutcome::Eligible {
            role: Role::from("Loyal_Crown"),
            label: None,
            message: "Access granted".into(),
        })
        .unwrap();

        let body = serde_json::to_value(&data).unwrap();
        assert!(body.get("label").is_none());
        assert_eq!(body["roles"], "Loyal_Crown");
    }

    #[test]
    fn not_eligible_outcome_omits_role() {
        let data = EligibilityData::from_outcome(EligibilityOutcome::NotEligible {
            message: "nope".into(),
        })
        .unwrap();

        let body = serde_json::to_value(&data).unwrap();
        assert_eq!(body, json!({ "whitelisted": false, "message": "nope" }));
    }

    #[test]
    fn lookup_failure_has_no_data() {
        assert!(EligibilityData::from_outcome(EligibilityOutcome::LookupFailed).is_none());
    }

    #[test]
    fn request_keeps_raw_address_value() {
        let request: CheckWalletRequest = serde_json::from_str(r#"{"address": 42}"#).unwrap();
        assert_eq!(request.address, Some(json!(42)));

        let request: CheckWalletRequest = serde_json::from_str("{}").unwrap();
        assert!(request.address.is_none());
    }
}
