// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Address Codec
//!
//! Syntactic validation and canonicalization of EVM-style wallet addresses.
//! Nothing here touches chain state or storage: an address is only a string
//! that must look like `0x` followed by 40 hexadecimal digits.
//!
//! ## Rules
//!
//! - Leading/trailing whitespace is ignored.
//! - The `0x` prefix is matched literally (lowercase only; `0X...` is rejected).
//! - The 40-digit body is case-insensitive.
//! - The canonical form is the trimmed, lowercased address. It is the only
//!   form ever used as a storage key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Literal prefix every address must start with.
pub const ADDRESS_PREFIX: &str = "0x";

/// Total length of a valid address, prefix included.
pub const ADDRESS_LENGTH: usize = 42;

/// Why a raw input could not be turned into a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address required")]
    Missing,

    #[error("invalid address format")]
    InvalidFormat,
}

/// Check a raw string against the address grammar.
///
/// Never panics and never fails: malformed input simply returns `false`.
pub fn is_valid_address(raw: &str) -> bool {
    let trimmed = raw.trim();
    let Some(body) = trimmed.strip_prefix(ADDRESS_PREFIX) else {
        return false;
    };

    trimmed.len() == ADDRESS_LENGTH && body.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Same as [`is_valid_address`] for boundary values that may be absent or
/// not a string at all.
pub fn is_valid_value(raw: Option<&Value>) -> bool {
    raw.and_then(Value::as_str).is_some_and(is_valid_address)
}

/// Derive the canonical lookup key from a raw address.
///
/// Out-of-contract input (anything [`is_valid_address`] rejects) yields
/// [`AddressError::InvalidFormat`] rather than a bogus key.
pub fn canonicalize(raw: &str) -> Result<CanonicalAddress, AddressError> {
    CanonicalAddress::parse(raw)
}

/// Boundary rule for a request's `address` field.
///
/// Absent, `null`, empty and other "falsy" values count as missing; any other
/// value must be a string that passes validation.
pub fn validate_input(raw: Option<&Value>) -> Result<CanonicalAddress, AddressError> {
    let value = match raw {
        Some(value) if !is_blank(value) => value,
        _ => return Err(AddressError::Missing),
    };

    let text = value.as_str().ok_or(AddressError::InvalidFormat)?;
    CanonicalAddress::parse(text)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Shorten a valid address for display, e.g. `0x1234...abcd`.
///
/// Invalid input, or input too short to shorten, is returned unchanged.
pub fn format_for_display(raw: &str, start_chars: usize, end_chars: usize) -> String {
    if !is_valid_address(raw) {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    if trimmed.len() <= start_chars + end_chars {
        return raw.to_string();
    }
    format!(
        "{}...{}",
        &trimmed[..start_chars],
        &trimmed[trimmed.len() - end_chars..]
    )
}

// =============================================================================
// Canonical Address
// =============================================================================

/// A validated, lowercased wallet address.
///
/// Two raw inputs that differ only in hex-digit case or surrounding
/// whitespace produce equal `CanonicalAddress` values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "0x742d35cc6634c0532925a3b844bc9e7595f4ab12")]
pub struct CanonicalAddress(String);

impl CanonicalAddress {
    /// Validate and canonicalize in one step.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        if !is_valid_address(raw) {
            return Err(AddressError::InvalidFormat);
        }
        Ok(Self(raw.trim().to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CanonicalAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CanonicalAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CanonicalAddress> for String {
    fn from(value: CanonicalAddress) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDR: &str = "0x1234567890123456789012345678901234567890";
    const MIXED: &str = "0xAbCdEf7890123456789012345678901234561234";

    #[test]
    fn accepts_well_formed_addresses() {
        assert!(is_valid_address(ADDR));
        assert!(is_valid_address(MIXED));
        assert!(is_valid_address("0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD"));
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        assert!(is_valid_address(&format!("  {ADDR}\t")));
        assert!(is_valid_address(&format!("\n{MIXED} ")));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!is_valid_address("0x123"));
        assert!(!is_valid_address(&format!("{ADDR}0")));
        assert!(!is_valid_address("0x"));
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("   "));
    }

    #[test]
    fn prefix_is_case_sensitive() {
        assert!(!is_valid_address("0X1234567890123456789012345678901234567890"));
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(!is_valid_address("001234567890123456789012345678901234567890"));
        assert!(!is_valid_address("1234567890123456789012345678901234567890ab"));
    }

    #[test]
    fn rejects_non_hex_body() {
        assert!(!is_valid_address("0xgg34567890123456789012345678901234567890"));
        assert!(!is_valid_address("0x12345678901234567890123456789012345678 0"));
        assert!(!is_valid_address("0x123456789012345678901234567890123456789é"));
        assert!(!is_valid_address("not-an-address"));
    }

    #[test]
    fn value_validation_rejects_non_strings() {
        assert!(is_valid_value(Some(&json!(ADDR))));
        assert!(!is_valid_value(None));
        assert!(!is_valid_value(Some(&Value::Null)));
        assert!(!is_valid_value(Some(&json!(12345))));
        assert!(!is_valid_value(Some(&json!([ADDR]))));
        assert!(!is_valid_value(Some(&json!({ "address": ADDR }))));
    }

    #[test]
    fn canonical_form_ignores_case_and_whitespace() {
        let spaced = canonicalize(" 0xAbCdEf7890123456789012345678901234561234 ").unwrap();
        let lower = canonicalize("0xabcdef7890123456789012345678901234561234").unwrap();
        assert_eq!(spaced, lower);
        assert_eq!(lower.as_str(), "0xabcdef7890123456789012345678901234561234");
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let once = canonicalize(MIXED).unwrap();
        let twice = canonicalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn canonicalize_refuses_invalid_input() {
        assert_eq!(canonicalize("0x123"), Err(AddressError::InvalidFormat));
        assert_eq!(
            "not-an-address".parse::<CanonicalAddress>(),
            Err(AddressError::InvalidFormat)
        );
    }

    #[test]
    fn validate_input_distinguishes_missing_from_malformed() {
        assert_eq!(validate_input(None), Err(AddressError::Missing));
        assert_eq!(validate_input(Some(&Value::Null)), Err(AddressError::Missing));
        assert_eq!(validate_input(Some(&json!(""))), Err(AddressError::Missing));
        assert_eq!(validate_input(Some(&json!(false))), Err(AddressError::Missing));
        assert_eq!(validate_input(Some(&json!(0))), Err(AddressError::Missing));

        assert_eq!(
            validate_input(Some(&json!("not-an-address"))),
            Err(AddressError::InvalidFormat)
        );
        assert_eq!(validate_input(Some(&json!("   "))), Err(AddressError::InvalidFormat));
        assert_eq!(validate_input(Some(&json!(42))), Err(AddressError::InvalidFormat));
        assert_eq!(validate_input(Some(&json!(true))), Err(AddressError::InvalidFormat));

        let key = validate_input(Some(&json!(MIXED))).unwrap();
        assert_eq!(key.as_str(), MIXED.to_ascii_lowercase());
    }

    #[test]
    fn error_messages_are_client_facing() {
        assert_eq!(AddressError::Missing.to_string(), "address required");
        assert_eq!(AddressError::InvalidFormat.to_string(), "invalid address format");
    }

    #[test]
    fn serde_round_trip_revalidates() {
        let key = canonicalize(MIXED).unwrap();
        let encoded = serde_json::to_string(&key).unwrap();
        assert_eq!(encoded, format!("\"{}\"", MIXED.to_ascii_lowercase()));

        let decoded: CanonicalAddress = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, key);

        assert!(serde_json::from_str::<CanonicalAddress>("\"0x123\"").is_err());
    }

    #[test]
    fn display_format_shortens_valid_addresses() {
        assert_eq!(format_for_display(ADDR, 6, 4), "0x1234...7890");
        assert_eq!(format_for_display("not-an-address", 6, 4), "not-an-address");
        assert_eq!(format_for_display(ADDR, 30, 20), ADDR);
    }
}
