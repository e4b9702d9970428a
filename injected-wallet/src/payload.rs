//! Interpretation of raw provider payloads.
//!
//! Providers hand back loosely typed JSON. These helpers turn it into
//! checksummed addresses and numeric chain ids, or explain why they can't.

use std::str::FromStr;

use alloy::primitives::Address;
use serde_json::Value;

/// Parse an account string into an [`Address`].
///
/// Accepts any letter case; the returned address displays in EIP-55
/// checksummed form.
///
/// # Errors
///
/// Returns a description if `raw` is not a 20-byte hex address.
pub fn parse_address(raw: &str) -> Result<Address, String> {
    Address::from_str(raw.trim()).map_err(|e| format!("invalid address '{raw}': {e}"))
}

/// Normalize an account string to its EIP-55 checksummed form.
///
/// # Errors
///
/// Same as [`parse_address`].
pub fn checksum_address(raw: &str) -> Result<String, String> {
    parse_address(raw).map(|address| address.to_checksum(None))
}

/// Extract the active (first) account from an accounts payload.
///
/// Returns `Ok(None)` for an empty list.
///
/// # Errors
///
/// Returns a description if the payload is not an array or its first
/// entry is not an address string.
pub fn first_account(payload: &Value) -> Result<Option<Address>, String> {
    let accounts = payload
        .as_array()
        .ok_or_else(|| format!("expected an array of accounts, got {payload}"))?;

    match accounts.first() {
        None => Ok(None),
        Some(Value::String(raw)) => parse_address(raw).map(Some),
        Some(other) => Err(format!("expected an account string, got {other}")),
    }
}

/// Parse a chain id payload.
///
/// Providers report hex strings such as `"0x89"`; decimal strings and JSON
/// numbers are accepted too.
///
/// # Errors
///
/// Returns a description if the payload is not a non-negative integer.
pub fn parse_chain_id(payload: &Value) -> Result<u64, String> {
    match payload {
        Value::String(raw) => parse_chain_id_str(raw),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| format!("chain id out of range: {n}")),
        other => Err(format!("expected a chain id string, got {other}")),
    }
}

fn parse_chain_id_str(raw: &str) -> Result<u64, String> {
    let trimmed = raw.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid chain id '{raw}': {e}"))
}
